//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    name TEXT NOT NULL,
    image TEXT,
    dietary_restrictions TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Recipes table
CREATE TABLE IF NOT EXISTS recipes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    image TEXT NOT NULL,
    ingredients TEXT NOT NULL,
    steps TEXT NOT NULL,
    tags TEXT NOT NULL,
    dietary_restrictions TEXT NOT NULL,
    owner TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Reviews table
CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    recipe_id TEXT NOT NULL,
    reviewer TEXT NOT NULL,
    owner TEXT,
    rating INTEGER NOT NULL,
    comment TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE
);

-- Favorites join table
CREATE TABLE IF NOT EXISTS favorites (
    user_id TEXT NOT NULL,
    recipe_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, recipe_id),
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE
);

-- Vendors table
CREATE TABLE IF NOT EXISTS vendors (
    id TEXT PRIMARY KEY,
    owner TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL UNIQUE,
    address TEXT NOT NULL,
    hours TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Ingredient listings table
CREATE TABLE IF NOT EXISTS ingredients (
    id TEXT PRIMARY KEY,
    vendor_id TEXT NOT NULL,
    owner TEXT NOT NULL,
    name TEXT NOT NULL,
    price REAL NOT NULL,
    size TEXT NOT NULL,
    available INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (vendor_id) REFERENCES vendors(id) ON DELETE CASCADE
);

-- Uploaded image metadata table
CREATE TABLE IF NOT EXISTS uploaded_images (
    id TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    pathname TEXT NOT NULL,
    size INTEGER NOT NULL,
    owner TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Page visit log (landing-page counter)
CREATE TABLE IF NOT EXISTS page_visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT NOT NULL,
    visited_at TEXT NOT NULL
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_recipes_owner ON recipes(owner);
CREATE INDEX IF NOT EXISTS idx_reviews_recipe_id ON reviews(recipe_id);
CREATE INDEX IF NOT EXISTS idx_favorites_recipe_id ON favorites(recipe_id);
CREATE INDEX IF NOT EXISTS idx_ingredients_vendor_id ON ingredients(vendor_id);
CREATE INDEX IF NOT EXISTS idx_uploaded_images_owner ON uploaded_images(owner);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, email, password_hash, role, name, image, dietary_restrictions, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, email, password_hash, role, name, image, dietary_restrictions, created_at, updated_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, email, password_hash, role, name, image, dietary_restrictions, created_at, updated_at
FROM users
WHERE email = ?1
"#;

pub const SELECT_ALL_USERS: &str = r#"
SELECT id, email, password_hash, role, name, image, dietary_restrictions, created_at, updated_at
FROM users
ORDER BY created_at ASC
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET email = ?2, name = ?3, image = ?4, dietary_restrictions = ?5, updated_at = ?6
WHERE id = ?1
"#;

pub const UPDATE_USER_ROLE: &str = r#"
UPDATE users
SET role = ?2, updated_at = ?3
WHERE id = ?1
"#;

pub const UPDATE_USER_PASSWORD: &str = r#"
UPDATE users
SET password_hash = ?2, updated_at = ?3
WHERE id = ?1
"#;

pub const DELETE_USER: &str = r#"
DELETE FROM users
WHERE id = ?1
"#;

pub const COUNT_USERS: &str = r#"
SELECT COUNT(*) FROM users
"#;

// Recipe queries
pub const INSERT_RECIPE: &str = r#"
INSERT INTO recipes (id, name, image, ingredients, steps, tags, dietary_restrictions, owner, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

pub const SELECT_RECIPE_BY_ID: &str = r#"
SELECT id, name, image, ingredients, steps, tags, dietary_restrictions, owner, created_at, updated_at
FROM recipes
WHERE id = ?1
"#;

pub const SELECT_ALL_RECIPES: &str = r#"
SELECT id, name, image, ingredients, steps, tags, dietary_restrictions, owner, created_at, updated_at
FROM recipes
ORDER BY created_at DESC
"#;

pub const SELECT_RECIPES_BY_OWNER: &str = r#"
SELECT id, name, image, ingredients, steps, tags, dietary_restrictions, owner, created_at, updated_at
FROM recipes
WHERE owner = ?1
ORDER BY created_at DESC
"#;

pub const SELECT_FAVORITE_RECIPES: &str = r#"
SELECT r.id, r.name, r.image, r.ingredients, r.steps, r.tags, r.dietary_restrictions, r.owner, r.created_at, r.updated_at
FROM recipes r
INNER JOIN favorites f ON r.id = f.recipe_id
WHERE f.user_id = ?1
ORDER BY f.created_at DESC
"#;

pub const UPDATE_RECIPE: &str = r#"
UPDATE recipes
SET name = ?2, image = ?3, ingredients = ?4, steps = ?5, tags = ?6, dietary_restrictions = ?7, updated_at = ?8
WHERE id = ?1
"#;

pub const DELETE_RECIPE: &str = r#"
DELETE FROM recipes
WHERE id = ?1
"#;

pub const COUNT_RECIPES: &str = r#"
SELECT COUNT(*) FROM recipes
"#;

// Review queries
pub const INSERT_REVIEW: &str = r#"
INSERT INTO reviews (id, recipe_id, reviewer, owner, rating, comment, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_REVIEW_BY_ID: &str = r#"
SELECT id, recipe_id, reviewer, owner, rating, comment, created_at
FROM reviews
WHERE id = ?1
"#;

pub const SELECT_REVIEWS_BY_RECIPE: &str = r#"
SELECT id, recipe_id, reviewer, owner, rating, comment, created_at
FROM reviews
WHERE recipe_id = ?1
ORDER BY created_at DESC
"#;

pub const DELETE_REVIEW: &str = r#"
DELETE FROM reviews
WHERE id = ?1
"#;

pub const DELETE_REVIEWS_BY_RECIPE: &str = r#"
DELETE FROM reviews
WHERE recipe_id = ?1
"#;

// Favorite queries
pub const SELECT_FAVORITE: &str = r#"
SELECT 1 FROM favorites
WHERE user_id = ?1 AND recipe_id = ?2
"#;

pub const SELECT_FAVORITE_RECIPE_IDS: &str = r#"
SELECT recipe_id FROM favorites
WHERE user_id = ?1
"#;

pub const INSERT_FAVORITE: &str = r#"
INSERT INTO favorites (user_id, recipe_id, created_at)
VALUES (?1, ?2, ?3)
"#;

pub const DELETE_FAVORITE: &str = r#"
DELETE FROM favorites
WHERE user_id = ?1 AND recipe_id = ?2
"#;

pub const DELETE_FAVORITES_BY_RECIPE: &str = r#"
DELETE FROM favorites
WHERE recipe_id = ?1
"#;

// Vendor queries
pub const INSERT_VENDOR: &str = r#"
INSERT INTO vendors (id, owner, name, address, hours, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_VENDOR_BY_ID: &str = r#"
SELECT id, owner, name, address, hours, created_at, updated_at
FROM vendors
WHERE id = ?1
"#;

pub const SELECT_VENDOR_BY_OWNER: &str = r#"
SELECT id, owner, name, address, hours, created_at, updated_at
FROM vendors
WHERE owner = ?1
"#;

pub const SELECT_VENDOR_BY_NAME: &str = r#"
SELECT id, owner, name, address, hours, created_at, updated_at
FROM vendors
WHERE name = ?1
"#;

pub const SELECT_ALL_VENDORS: &str = r#"
SELECT id, owner, name, address, hours, created_at, updated_at
FROM vendors
ORDER BY name ASC
"#;

pub const UPDATE_VENDOR: &str = r#"
UPDATE vendors
SET name = ?2, address = ?3, hours = ?4, updated_at = ?5
WHERE id = ?1
"#;

pub const DELETE_VENDOR: &str = r#"
DELETE FROM vendors
WHERE id = ?1
"#;

pub const DELETE_INGREDIENTS_BY_VENDOR: &str = r#"
DELETE FROM ingredients
WHERE vendor_id = ?1
"#;

pub const COUNT_VENDORS: &str = r#"
SELECT COUNT(*) FROM vendors
"#;

// Ingredient queries
pub const INSERT_INGREDIENT: &str = r#"
INSERT INTO ingredients (id, vendor_id, owner, name, price, size, available, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_INGREDIENT_BY_ID: &str = r#"
SELECT id, vendor_id, owner, name, price, size, available, created_at
FROM ingredients
WHERE id = ?1
"#;

pub const SELECT_INGREDIENTS_BY_VENDOR: &str = r#"
SELECT id, vendor_id, owner, name, price, size, available, created_at
FROM ingredients
WHERE vendor_id = ?1
ORDER BY name ASC
"#;

pub const SELECT_AVAILABLE_INGREDIENTS: &str = r#"
SELECT id, vendor_id, owner, name, price, size, available, created_at
FROM ingredients
WHERE available = 1
ORDER BY name ASC
"#;

pub const UPDATE_INGREDIENT: &str = r#"
UPDATE ingredients
SET name = ?2, price = ?3, size = ?4, available = ?5
WHERE id = ?1
"#;

pub const DELETE_INGREDIENT: &str = r#"
DELETE FROM ingredients
WHERE id = ?1
"#;

// Uploaded image queries
pub const INSERT_IMAGE: &str = r#"
INSERT INTO uploaded_images (id, url, pathname, size, owner, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_IMAGE_BY_ID: &str = r#"
SELECT id, url, pathname, size, owner, created_at
FROM uploaded_images
WHERE id = ?1
"#;

pub const SELECT_IMAGES_BY_OWNER: &str = r#"
SELECT id, url, pathname, size, owner, created_at
FROM uploaded_images
WHERE owner = ?1
ORDER BY created_at DESC
"#;

pub const DELETE_IMAGE: &str = r#"
DELETE FROM uploaded_images
WHERE id = ?1
"#;

pub const DELETE_IMAGES_BY_URL: &str = r#"
DELETE FROM uploaded_images
WHERE url = ?1
"#;

// Page visit queries
pub const INSERT_VISIT: &str = r#"
INSERT INTO page_visits (path, visited_at)
VALUES (?1, ?2)
"#;

pub const COUNT_VISITS: &str = r#"
SELECT COUNT(*) FROM page_visits
"#;
