//! Project README.

pub(super) const PROJECT_README: &str = r#"# {{PROJECT_NAME}}

Generated by stacksmith on {{GENERATED_AT}}.

## Stack

- **Frontend**: {{FRONTEND}}
- **Backend**: {{BACKEND}}
- **Database**: {{DATABASE}}
- **Authentication**: {{AUTH}}

## Prerequisites

- **Node.js** for the frontend{{NODE_BACKEND_NOTE}}
{{PYTHON_PREREQ}}- **{{DATABASE}}**: {{DATABASE_PREREQ}}

## Setup

### 1. Environment

A `.env` file was generated in the project root with the values you entered.
Check it before starting anything.

### 2. Backend

```bash
cd server
{{BACKEND_INSTALL}}
{{BACKEND_START}}
```

### 3. Frontend

```bash
cd client
npm install
npm start
```

## Running

1. Start the backend in one terminal.
2. Start the frontend in another.
3. Open the URL printed by the frontend dev server.

## Layout

```
{{PROJECT_NAME}}/
├── client/     # Frontend ({{FRONTEND}})
├── server/     # Backend ({{BACKEND}})
├── .env        # Environment variables
└── README.md
```

## Troubleshooting

- **Connection refused**: check the database is reachable and the connection settings in `.env`.
- **Port in use**: set `PORT` in `.env`.
"#;
