//! Built-in file content.
//!
//! Bodies are static strings with `{{VARIABLE}}` placeholders, filled from
//! the [`RenderContext`] by simple substitution.
//!
//! ## Variables
//!
//! | Variable | Example |
//! |----------|---------|
//! | `PROJECT_NAME` | "shop" |
//! | `FRONTEND` / `BACKEND` / `DATABASE` / `AUTH` | "Node + Express" |
//! | `GENERATED_AT` | "2026-03-01" |
//! | `BACKEND_INSTALL` | "source venv/bin/activate && pip install -r requirements.txt" |
//! | `PYTHON_REQUIREMENTS` | one pip package per line |

mod node;
mod python;
mod readme;

use chrono::{Local, NaiveDate};
use stacksmith_core::{
    application::ports::{ContentGenerator, RenderContext},
    domain::{Auth, Backend, BackendFamily, ContentKind, Database, StackSelection, backend_strategy},
};
use tracing::trace;

/// Content generator backed by the bodies compiled into the binary.
#[derive(Debug, Clone)]
pub struct BuiltinContent {
    /// Fixed date for reproducible output; today's date when `None`.
    date: Option<NaiveDate>,
}

impl BuiltinContent {
    pub fn new() -> Self {
        Self { date: None }
    }

    /// Stamp generated READMEs with a fixed date.
    pub fn with_date(date: NaiveDate) -> Self {
        Self { date: Some(date) }
    }

    fn template(kind: ContentKind, selection: &StackSelection) -> &'static str {
        match kind {
            ContentKind::DatabaseConfig => match selection.database() {
                Database::MongoDb => node::MONGODB_CONFIG,
                Database::PostgreSql => node::POSTGRESQL_CONFIG,
                Database::MySql => node::MYSQL_CONFIG,
                Database::Firestore => node::FIRESTORE_CONFIG,
            },
            ContentKind::ExpressServer => node::EXPRESS_SERVER,
            ContentKind::ExpressApp => node::EXPRESS_APP,
            ContentKind::ExpressAuthRoute => match selection.auth() {
                Auth::Jwt => node::EXPRESS_JWT_ROUTE,
                Auth::FirebaseAuth => node::EXPRESS_FIREBASE_ROUTE,
            },
            ContentKind::FastifyServer => node::FASTIFY_SERVER,
            ContentKind::FlaskApp => python::FLASK_APP,
            ContentKind::PythonRequirements => python::REQUIREMENTS,
            ContentKind::DjangoReadme => python::DJANGO_README,
            ContentKind::ProjectReadme => readme::PROJECT_README,
        }
    }

    fn variables(&self, ctx: &RenderContext) -> Vec<(&'static str, String)> {
        let sel = &ctx.selection;
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let node_backend = sel.backend().family() == BackendFamily::Node;

        let pip_install = format!(
            "{} && pip install -r requirements.txt",
            ctx.toolchain.venv_activate()
        );
        let (install, start) = match sel.backend() {
            Backend::NodeExpress | Backend::NodeFastify => ("npm install".to_string(), "node server.js"),
            Backend::Flask => (pip_install, "python app.py"),
            Backend::Django => (pip_install, "python manage.py runserver"),
        };
        let requirements: String = backend_strategy(sel.backend(), sel.database())
            .map(|strategy| strategy.dependencies(sel.auth()))
            .unwrap_or_default()
            .iter()
            .map(|package| format!("{package}\n"))
            .collect();

        vec![
            ("PROJECT_NAME", ctx.project_name.clone()),
            ("FRONTEND", sel.frontend().to_string()),
            ("BACKEND", sel.backend().to_string()),
            ("DATABASE", sel.database().to_string()),
            ("AUTH", sel.auth().to_string()),
            ("GENERATED_AT", date.format("%Y-%m-%d").to_string()),
            (
                "NODE_BACKEND_NOTE",
                if node_backend { " and backend" } else { "" }.to_string(),
            ),
            (
                "PYTHON_PREREQ",
                if node_backend {
                    String::new()
                } else {
                    "- **Python 3** for the backend (a `venv` was created in `server/`)\n".into()
                },
            ),
            (
                "DATABASE_PREREQ",
                if sel.database().is_managed() {
                    "a Firebase project with application default credentials".into()
                } else {
                    "running locally or reachable through the connection string".into()
                },
            ),
            ("BACKEND_INSTALL", install),
            ("PYTHON_REQUIREMENTS", requirements),
            ("BACKEND_START", start.to_string()),
        ]
    }
}

impl Default for BuiltinContent {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentGenerator for BuiltinContent {
    fn render(&self, kind: ContentKind, context: &RenderContext) -> String {
        trace!(?kind, "rendering built-in content");
        substitute(Self::template(kind, &context.selection), &self.variables(context))
    }
}

/// Replace every `{{NAME}}` with its value. Unknown placeholders are kept.
fn substitute(template: &str, variables: &[(&'static str, String)]) -> String {
    variables
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{{{name}}}}}"), value)
        })
}
