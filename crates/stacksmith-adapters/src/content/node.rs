//! Node backend file bodies.

pub(super) const MONGODB_CONFIG: &str = r#"const mongoose = require('mongoose');

const connectDB = async () => {
  try {
    await mongoose.connect(process.env.MONGO_URI);
    console.log('MongoDB connected');
  } catch (err) {
    console.error(err.message);
    process.exit(1);
  }
};

module.exports = connectDB;
"#;

pub(super) const POSTGRESQL_CONFIG: &str = r#"const { Pool } = require('pg');

const pool = new Pool({ connectionString: process.env.DB_CONNECTION_STRING });

const connectDB = async () => {
  try {
    await pool.connect();
    console.log('PostgreSQL connected');
  } catch (err) {
    console.error(err.message);
    process.exit(1);
  }
};

module.exports = connectDB;
module.exports.pool = pool;
"#;

pub(super) const MYSQL_CONFIG: &str = r#"const mysql = require('mysql2/promise');

const connectDB = async () => {
  try {
    const connection = await mysql.createConnection(process.env.DB_CONNECTION_STRING);
    console.log('MySQL connected');
    return connection;
  } catch (err) {
    console.error(err.message);
    process.exit(1);
  }
};

module.exports = connectDB;
"#;

pub(super) const FIRESTORE_CONFIG: &str = r#"const admin = require('firebase-admin');

const connectDB = async () => {
  try {
    if (!admin.apps.length) {
      admin.initializeApp({
        credential: admin.credential.applicationDefault(),
        projectId: process.env.FIREBASE_PROJECT_ID,
      });
    }
    console.log('Firestore connected');
  } catch (err) {
    console.error(err.message);
    process.exit(1);
  }
};

module.exports = connectDB;
"#;

pub(super) const EXPRESS_SERVER: &str = r#"require('dotenv').config({ path: '../.env' });
const app = require('./app');
const connectDB = require('./config/db');

connectDB();

const PORT = process.env.PORT || 5000;
app.listen(PORT, () => console.log(`{{PROJECT_NAME}} API listening on port ${PORT}`));
"#;

pub(super) const EXPRESS_APP: &str = r#"const express = require('express');
const cors = require('cors');

const app = express();

app.use(cors());
app.use(express.json());

app.use('/api/auth', require('./routes/auth'));

module.exports = app;
"#;

pub(super) const EXPRESS_JWT_ROUTE: &str = r#"const express = require('express');
const bcrypt = require('bcryptjs');
const jwt = require('jsonwebtoken');

const router = express.Router();

// In-memory store; replace with a model from ../models.
const users = [];

const sign = (email) =>
  jwt.sign({ user: { email } }, process.env.JWT_SECRET, { expiresIn: '1h' });

router.post('/register', async (req, res) => {
  const { email, password } = req.body;
  if (users.some((u) => u.email === email)) {
    return res.status(400).json({ msg: 'User already exists' });
  }
  users.push({ email, hash: await bcrypt.hash(password, 10) });
  res.json({ token: sign(email) });
});

router.post('/login', async (req, res) => {
  const { email, password } = req.body;
  const user = users.find((u) => u.email === email);
  if (!user || !(await bcrypt.compare(password, user.hash))) {
    return res.status(400).json({ msg: 'Invalid credentials' });
  }
  res.json({ token: sign(email) });
});

module.exports = router;
"#;

pub(super) const EXPRESS_FIREBASE_ROUTE: &str = r#"const express = require('express');
const admin = require('firebase-admin');

const router = express.Router();

if (!admin.apps.length) {
  admin.initializeApp({ projectId: process.env.FIREBASE_PROJECT_ID });
}

// Verifies the Firebase ID token sent as `Authorization: Bearer <token>`.
const verifyToken = async (req, res, next) => {
  const token = req.header('Authorization')?.split('Bearer ')[1];
  if (!token) return res.status(401).json({ msg: 'No token, authorization denied' });
  try {
    req.user = await admin.auth().verifyIdToken(token);
    next();
  } catch (e) {
    res.status(401).json({ msg: 'Token is not valid' });
  }
};

router.get('/me', verifyToken, (req, res) => {
  res.json(req.user);
});

module.exports = router;
"#;

pub(super) const FASTIFY_SERVER: &str = r#"require('dotenv').config({ path: '../.env' });
const fastify = require('fastify')({ logger: true });
const connectDB = require('./config/db');

fastify.register(require('@fastify/cors'));

fastify.get('/', async () => ({ hello: '{{PROJECT_NAME}}' }));

const start = async () => {
  try {
    await connectDB();
    await fastify.listen({ port: Number(process.env.PORT) || 5000 });
  } catch (err) {
    fastify.log.error(err);
    process.exit(1);
  }
};

start();
"#;
