//! Generation strategy tables.
//!
//! Each catalog value maps to a strategy record through an exhaustive
//! `match`, so adding a variant is a compile error until every table has
//! an arm. Strategies only *describe* work: commands to run and files to
//! write. Executing them is the orchestrator's job.
//!
//! The template resolution check lives here as well: a backend/database
//! pair has a template exactly when [`backend_strategy`] resolves it.

use std::fmt;

use serde::Serialize;

use crate::domain::entities::stack::StackSelection;
use crate::domain::value_objects::{Auth, Backend, Database, Frontend};

// ── CommandSpec ──────────────────────────────────────────────────────────────

/// A fully-resolved external command: program plus literal arguments.
///
/// No placeholders survive into a `CommandSpec`; everything that depends
/// on the selection or project name is substituted at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ── Toolchain ────────────────────────────────────────────────────────────────

/// Host-specific tool locations used when building backend commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Interpreter used to create the virtual environment.
    pub python: String,
    /// Whether venv executables live under `Scripts\` instead of `bin/`.
    pub windows: bool,
}

impl Toolchain {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            windows: cfg!(windows),
        }
    }

    /// Shell line that activates the project's virtual environment.
    pub fn venv_activate(&self) -> &'static str {
        if self.windows {
            "venv\\Scripts\\activate"
        } else {
            "source venv/bin/activate"
        }
    }

    fn venv_tool(&self, tool: &str) -> String {
        if self.windows {
            format!("venv\\Scripts\\{tool}")
        } else {
            format!("venv/bin/{tool}")
        }
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new("python")
    }
}

// ── Frontend strategies ──────────────────────────────────────────────────────

/// How a frontend is scaffolded into `client/`.
#[derive(Clone, Copy)]
pub struct FrontendStrategy {
    pub frontend: Frontend,
    build: fn(&str) -> CommandSpec,
}

impl FrontendStrategy {
    /// Resolve the generator command for a project.
    pub fn command(&self, project_name: &str) -> CommandSpec {
        (self.build)(project_name)
    }
}

pub fn frontend_strategy(frontend: Frontend) -> FrontendStrategy {
    let build: fn(&str) -> CommandSpec = match frontend {
        Frontend::React => |_| CommandSpec::new("npx").args(["-y", "create-react-app", "."]),
        Frontend::NextJs => |_| {
            CommandSpec::new("npx").args(["-y", "create-next-app@latest", ".", "--yes"])
        },
        Frontend::Vue => |_| CommandSpec::new("npm").args(["create", "vue@latest", ".", "--", "--yes"]),
        Frontend::Angular => |name| {
            CommandSpec::new("npx")
                .args(["-p", "@angular/cli", "ng", "new"])
                .arg(format!("{name}-client"))
                .args(["--directory", ".", "--skip-install", "--defaults"])
        },
        Frontend::Svelte => |_| CommandSpec::new("npm").args(["create", "svelte@latest", "."]),
    };
    FrontendStrategy { frontend, build }
}

// ── Generated content ────────────────────────────────────────────────────────

/// Files whose bodies come from the content generator port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    /// Database connection module (`config/db.js`).
    DatabaseConfig,
    ExpressServer,
    ExpressApp,
    ExpressAuthRoute,
    FastifyServer,
    FlaskApp,
    /// Pinned-by-name pip requirements for Python backends.
    PythonRequirements,
    DjangoReadme,
    ProjectReadme,
}

// ── Backend strategies ───────────────────────────────────────────────────────

/// Node HTTP framework flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFlavor {
    Express,
    Fastify,
}

/// Resolved backend generation strategy for one backend/database pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStrategy {
    Node {
        flavor: NodeFlavor,
        /// npm package providing the database client.
        driver: &'static str,
    },
    Flask {
        drivers: &'static [&'static str],
    },
    Django {
        drivers: &'static [&'static str],
    },
}

/// One unit of backend work, relative to `server/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendAction {
    /// External command, always executed through the command runner.
    Run {
        label: &'static str,
        command: CommandSpec,
    },
    CreateDir(&'static str),
    WriteFile {
        path: &'static str,
        content: ContentKind,
    },
}

/// Subdirectories every Node backend gets.
pub const NODE_SKELETON: &[&str] = &["config", "models", "routes", "middleware"];

/// Resolve the backend strategy for a pair, or `None` when no generation
/// template is registered for it.
pub fn backend_strategy(backend: Backend, database: Database) -> Option<BackendStrategy> {
    match backend {
        Backend::NodeExpress | Backend::NodeFastify => {
            let flavor = if backend == Backend::NodeExpress {
                NodeFlavor::Express
            } else {
                NodeFlavor::Fastify
            };
            let driver = match database {
                Database::MongoDb => "mongoose",
                Database::PostgreSql => "pg",
                Database::MySql => "mysql2",
                Database::Firestore => "firebase-admin",
            };
            Some(BackendStrategy::Node { flavor, driver })
        }
        Backend::Flask => {
            let drivers: &'static [&'static str] = match database {
                Database::PostgreSql => &["flask-sqlalchemy", "psycopg2-binary"],
                Database::MySql => &["flask-sqlalchemy", "mysql-connector-python"],
                Database::MongoDb | Database::Firestore => return None,
            };
            Some(BackendStrategy::Flask { drivers })
        }
        Backend::Django => {
            let drivers: &'static [&'static str] = match database {
                Database::PostgreSql => &["psycopg2-binary"],
                Database::MySql => &["mysqlclient"],
                Database::MongoDb | Database::Firestore => return None,
            };
            Some(BackendStrategy::Django { drivers })
        }
    }
}

/// Template resolution check.
///
/// Pure and side-effect free. `false` means generation must not start.
pub fn has_template(backend: Backend, database: Database) -> bool {
    backend_strategy(backend, database).is_some()
}

impl BackendStrategy {
    /// Packages to install for this strategy and auth choice, in install order.
    pub fn dependencies(&self, auth: Auth) -> Vec<&'static str> {
        let mut deps: Vec<&'static str> = Vec::new();
        match *self {
            Self::Node { flavor, driver } => {
                deps.extend(["dotenv", "cors"]);
                match flavor {
                    NodeFlavor::Express => deps.push("express"),
                    NodeFlavor::Fastify => deps.extend(["fastify", "@fastify/cors"]),
                }
                deps.push(driver);
                match auth {
                    Auth::Jwt => deps.extend(["jsonwebtoken", "bcryptjs"]),
                    Auth::FirebaseAuth => {
                        if !deps.contains(&"firebase-admin") {
                            deps.push("firebase-admin");
                        }
                    }
                }
            }
            Self::Flask { drivers } => {
                deps.extend(["flask", "flask-cors", "python-dotenv"]);
                deps.extend_from_slice(drivers);
                if auth == Auth::Jwt {
                    deps.push("pyjwt");
                }
            }
            Self::Django { drivers } => {
                deps.extend([
                    "django",
                    "djangorestframework",
                    "python-dotenv",
                    "django-cors-headers",
                ]);
                deps.extend_from_slice(drivers);
            }
        }
        deps
    }

    /// Ordered backend sub-sequence for a selection.
    pub fn plan(&self, selection: &StackSelection, toolchain: &Toolchain) -> Vec<BackendAction> {
        let deps = self.dependencies(selection.auth());
        match *self {
            Self::Node { flavor, .. } => {
                let mut actions = vec![
                    BackendAction::Run {
                        label: "Initialising package manifest",
                        command: CommandSpec::new("npm").args(["init", "-y"]),
                    },
                    BackendAction::Run {
                        label: "Installing dependencies",
                        command: CommandSpec::new("npm").arg("install").args(deps),
                    },
                ];
                actions.extend(NODE_SKELETON.iter().map(|dir| BackendAction::CreateDir(dir)));
                actions.push(BackendAction::WriteFile {
                    path: "config/db.js",
                    content: ContentKind::DatabaseConfig,
                });
                match flavor {
                    NodeFlavor::Express => actions.extend([
                        BackendAction::WriteFile {
                            path: "server.js",
                            content: ContentKind::ExpressServer,
                        },
                        BackendAction::WriteFile {
                            path: "app.js",
                            content: ContentKind::ExpressApp,
                        },
                        BackendAction::WriteFile {
                            path: "routes/auth.js",
                            content: ContentKind::ExpressAuthRoute,
                        },
                    ]),
                    NodeFlavor::Fastify => actions.push(BackendAction::WriteFile {
                        path: "server.js",
                        content: ContentKind::FastifyServer,
                    }),
                }
                actions
            }
            Self::Flask { .. } => vec![
                create_venv(toolchain),
                BackendAction::Run {
                    label: "Installing Python dependencies",
                    command: CommandSpec::new(toolchain.venv_tool("pip"))
                        .arg("install")
                        .args(deps),
                },
                BackendAction::WriteFile {
                    path: "requirements.txt",
                    content: ContentKind::PythonRequirements,
                },
                BackendAction::WriteFile {
                    path: "app.py",
                    content: ContentKind::FlaskApp,
                },
            ],
            Self::Django { .. } => vec![
                create_venv(toolchain),
                BackendAction::Run {
                    label: "Installing Django dependencies",
                    command: CommandSpec::new(toolchain.venv_tool("pip"))
                        .arg("install")
                        .args(deps),
                },
                BackendAction::WriteFile {
                    path: "requirements.txt",
                    content: ContentKind::PythonRequirements,
                },
                BackendAction::Run {
                    label: "Creating Django project",
                    command: CommandSpec::new(toolchain.venv_tool("python"))
                        .args(["-m", "django", "startproject", "config", "."]),
                },
                BackendAction::WriteFile {
                    path: "README.md",
                    content: ContentKind::DjangoReadme,
                },
            ],
        }
    }
}

fn create_venv(toolchain: &Toolchain) -> BackendAction {
    BackendAction::Run {
        label: "Creating virtual environment",
        command: CommandSpec::new(toolchain.python.as_str()).args(["-m", "venv", "venv"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compatibility::validate;

    fn selection(backend: Backend, database: Database, auth: Auth) -> StackSelection {
        StackSelection::builder()
            .frontend(Frontend::React)
            .backend(backend)
            .database(database)
            .unwrap()
            .auth(auth)
            .unwrap()
            .build()
            .unwrap()
    }

    fn unix() -> Toolchain {
        Toolchain {
            python: "python".into(),
            windows: false,
        }
    }

    #[test]
    fn every_frontend_scaffolds_into_the_current_dir() {
        for &frontend in Frontend::ALL {
            let strategy = frontend_strategy(frontend);
            assert_eq!(strategy.frontend, frontend);

            let cmd = strategy.command("shop");
            assert!(
                matches!(cmd.program(), "npx" | "npm"),
                "{frontend}: unexpected program {}",
                cmd.program()
            );
            assert!(
                cmd.arguments().iter().any(|arg| arg == "."),
                "{frontend}: {cmd} does not target the client dir"
            );
        }
    }

    #[test]
    fn angular_command_embeds_project_name() {
        let cmd = frontend_strategy(Frontend::Angular).command("shop");
        assert_eq!(
            cmd.to_string(),
            "npx -p @angular/cli ng new shop-client --directory . --skip-install --defaults"
        );
    }

    #[test]
    fn react_command_ignores_project_name() {
        let cmd = frontend_strategy(Frontend::React).command("shop");
        assert_eq!(cmd.to_string(), "npx -y create-react-app .");
    }

    #[test]
    fn frontend_commands_have_no_placeholders() {
        for &fe in Frontend::ALL {
            let cmd = frontend_strategy(fe).command("demo");
            assert!(!cmd.to_string().contains('{'), "{fe}: {cmd}");
        }
    }

    #[test]
    fn python_backends_have_no_template_for_document_stores() {
        for backend in [Backend::Flask, Backend::Django] {
            assert!(!has_template(backend, Database::MongoDb));
            assert!(!has_template(backend, Database::Firestore));
            assert!(has_template(backend, Database::PostgreSql));
            assert!(has_template(backend, Database::MySql));
        }
    }

    #[test]
    fn every_validated_stack_has_a_template() {
        for &backend in Backend::ALL {
            for &database in Database::ALL {
                for &auth in Auth::ALL {
                    if validate(backend, database, auth).is_empty() {
                        assert!(
                            has_template(backend, database),
                            "{backend} + {database} + {auth} validates but has no template"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn express_mongo_jwt_dependencies() {
        let strategy = backend_strategy(Backend::NodeExpress, Database::MongoDb).unwrap();
        assert_eq!(
            strategy.dependencies(Auth::Jwt),
            vec!["dotenv", "cors", "express", "mongoose", "jsonwebtoken", "bcryptjs"]
        );
    }

    #[test]
    fn firebase_admin_is_not_installed_twice() {
        let strategy = backend_strategy(Backend::NodeFastify, Database::Firestore).unwrap();
        let deps = strategy.dependencies(Auth::FirebaseAuth);
        assert_eq!(deps.iter().filter(|d| **d == "firebase-admin").count(), 1);
        assert!(deps.contains(&"@fastify/cors"));
    }

    #[test]
    fn firebase_auth_adds_admin_sdk_for_sql_node_backends() {
        let strategy = backend_strategy(Backend::NodeExpress, Database::PostgreSql).unwrap();
        assert!(strategy.dependencies(Auth::FirebaseAuth).contains(&"firebase-admin"));
    }

    #[test]
    fn flask_jwt_adds_pyjwt() {
        let strategy = backend_strategy(Backend::Flask, Database::MySql).unwrap();
        assert_eq!(
            strategy.dependencies(Auth::Jwt),
            vec![
                "flask",
                "flask-cors",
                "python-dotenv",
                "flask-sqlalchemy",
                "mysql-connector-python",
                "pyjwt"
            ]
        );
    }

    #[test]
    fn express_plan_creates_skeleton_before_writing_files() {
        let sel = selection(Backend::NodeExpress, Database::MongoDb, Auth::Jwt);
        let plan = backend_strategy(sel.backend(), sel.database())
            .unwrap()
            .plan(&sel, &unix());

        assert!(matches!(&plan[0], BackendAction::Run { command, .. } if command.to_string() == "npm init -y"));
        assert!(matches!(&plan[1], BackendAction::Run { command, .. } if command.to_string().starts_with("npm install dotenv cors express mongoose")));
        let first_write = plan
            .iter()
            .position(|a| matches!(a, BackendAction::WriteFile { .. }))
            .unwrap();
        let last_dir = plan
            .iter()
            .rposition(|a| matches!(a, BackendAction::CreateDir(_)))
            .unwrap();
        assert!(last_dir < first_write);
        assert!(plan.contains(&BackendAction::WriteFile {
            path: "routes/auth.js",
            content: ContentKind::ExpressAuthRoute,
        }));
    }

    #[test]
    fn python_plans_write_requirements_after_installing() {
        for backend in [Backend::Flask, Backend::Django] {
            let sel = selection(backend, Database::PostgreSql, Auth::Jwt);
            let plan = backend_strategy(sel.backend(), sel.database())
                .unwrap()
                .plan(&sel, &unix());

            let install = plan
                .iter()
                .position(|a| matches!(a, BackendAction::Run { command, .. } if command.to_string().starts_with("venv/bin/pip install")))
                .unwrap();
            let requirements = plan
                .iter()
                .position(|a| matches!(a, BackendAction::WriteFile { path: "requirements.txt", .. }))
                .unwrap();
            assert!(install < requirements, "{backend}");
        }
    }

    #[test]
    fn django_plan_uses_platform_venv_paths() {
        let sel = selection(Backend::Django, Database::PostgreSql, Auth::Jwt);
        let strategy = backend_strategy(sel.backend(), sel.database()).unwrap();

        let unix_plan = strategy.plan(&sel, &unix());
        assert!(unix_plan.iter().any(|a| matches!(a, BackendAction::Run { command, .. } if command.program() == "venv/bin/python")));

        let windows = Toolchain {
            python: "py".into(),
            windows: true,
        };
        let win_plan = strategy.plan(&sel, &windows);
        assert_eq!(windows.venv_activate(), "venv\\Scripts\\activate");
        assert!(matches!(&win_plan[0], BackendAction::Run { command, .. } if command.to_string() == "py -m venv venv"));
        assert!(win_plan.iter().any(|a| matches!(a, BackendAction::Run { command, .. } if command.program() == "venv\\Scripts\\pip")));
    }
}
