//! Python backend file bodies.

pub(super) const FLASK_APP: &str = r#"import os

from dotenv import load_dotenv
from flask import Flask, jsonify
from flask_cors import CORS
from flask_sqlalchemy import SQLAlchemy

load_dotenv(os.path.join(os.path.dirname(__file__), "..", ".env"))

app = Flask(__name__)
CORS(app)

# {{DATABASE}} via SQLAlchemy
app.config["SQLALCHEMY_DATABASE_URI"] = os.environ.get("DB_CONNECTION_STRING")
app.config["SQLALCHEMY_TRACK_MODIFICATIONS"] = False
db = SQLAlchemy(app)


class User(db.Model):
    id = db.Column(db.Integer, primary_key=True)
    username = db.Column(db.String(80), unique=True, nullable=False)


with app.app_context():
    db.create_all()


@app.route("/")
def hello():
    return jsonify({"message": "Hello from {{PROJECT_NAME}}!"})


if __name__ == "__main__":
    app.run(port=int(os.environ.get("PORT", 5000)))
"#;

pub(super) const DJANGO_README: &str = "# Django Apps\n\nConfigure .env and run python manage.py runserver\n";

pub(super) const REQUIREMENTS: &str = "{{PYTHON_REQUIREMENTS}}";
