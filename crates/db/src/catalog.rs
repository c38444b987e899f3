//! Catalog repository: pizzas and ingredients.

use sqlx::PgPool;

use fornaccio_core::{IngredientId, PizzaId};

use crate::models::{Ingredient, NewIngredient, NewPizza, Pizza, UpdateIngredient, UpdatePizza};
use crate::{RepositoryError, map_unique_violation};

const PIZZA_COLUMNS: &str =
    "id, slug, name, description, base_price, image, default_ingredients, is_available";

const INGREDIENT_COLUMNS: &str = "id, slug, name, price, category, is_available";

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Pizzas
    // =========================================================================

    /// List pizzas, alphabetically. `only_available` restricts to pizzas
    /// currently on the menu (the public storefront view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_pizzas(&self, only_available: bool) -> Result<Vec<Pizza>, RepositoryError> {
        let pizzas = sqlx::query_as::<_, Pizza>(&format!(
            "SELECT {PIZZA_COLUMNS} FROM pizza
             WHERE is_available OR NOT $1
             ORDER BY name ASC"
        ))
        .bind(only_available)
        .fetch_all(self.pool)
        .await?;

        Ok(pizzas)
    }

    /// Get a pizza by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_pizza(&self, id: PizzaId) -> Result<Option<Pizza>, RepositoryError> {
        let pizza = sqlx::query_as::<_, Pizza>(&format!(
            "SELECT {PIZZA_COLUMNS} FROM pizza WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(pizza)
    }

    /// Fetch several pizzas at once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_pizzas_by_ids(&self, ids: &[PizzaId]) -> Result<Vec<Pizza>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let pizzas = sqlx::query_as::<_, Pizza>(&format!(
            "SELECT {PIZZA_COLUMNS} FROM pizza WHERE id = ANY($1)"
        ))
        .bind(raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(pizzas)
    }

    /// Create a pizza.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_pizza(&self, new: &NewPizza) -> Result<Pizza, RepositoryError> {
        let pizza = sqlx::query_as::<_, Pizza>(&format!(
            "INSERT INTO pizza (slug, name, description, base_price, image, default_ingredients)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PIZZA_COLUMNS}"
        ))
        .bind(&new.slug)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.base_price)
        .bind(&new.image)
        .bind(&new.default_ingredients)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "pizza slug already exists"))?;

        Ok(pizza)
    }

    /// Update a pizza, including its availability flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the pizza doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_pizza(
        &self,
        id: PizzaId,
        update: &UpdatePizza,
    ) -> Result<Pizza, RepositoryError> {
        let pizza = sqlx::query_as::<_, Pizza>(&format!(
            "UPDATE pizza
             SET name = $1, description = $2, base_price = $3, image = $4,
                 default_ingredients = $5, is_available = $6, updated_at = now()
             WHERE id = $7
             RETURNING {PIZZA_COLUMNS}"
        ))
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.base_price)
        .bind(&update.image)
        .bind(&update.default_ingredients)
        .bind(update.is_available)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(pizza)
    }

    /// Delete a pizza. Past order items keep their name/price snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the pizza doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_pizza(&self, id: PizzaId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM pizza WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Ingredients
    // =========================================================================

    /// List ingredients grouped for the customization UI: by category, then
    /// by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_ingredients(
        &self,
        only_available: bool,
    ) -> Result<Vec<Ingredient>, RepositoryError> {
        let ingredients = sqlx::query_as::<_, Ingredient>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredient
             WHERE is_available OR NOT $1
             ORDER BY category DESC, name ASC"
        ))
        .bind(only_available)
        .fetch_all(self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Fetch several ingredients at once (checkout price resolution).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_ingredients_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let ingredients = sqlx::query_as::<_, Ingredient>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredient WHERE id = ANY($1)"
        ))
        .bind(raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Create an ingredient.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_ingredient(
        &self,
        new: &NewIngredient,
    ) -> Result<Ingredient, RepositoryError> {
        let ingredient = sqlx::query_as::<_, Ingredient>(&format!(
            "INSERT INTO ingredient (slug, name, price, category)
             VALUES ($1, $2, $3, $4)
             RETURNING {INGREDIENT_COLUMNS}"
        ))
        .bind(&new.slug)
        .bind(&new.name)
        .bind(new.price)
        .bind(new.category)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "ingredient slug already exists"))?;

        Ok(ingredient)
    }

    /// Update an ingredient, including its availability flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ingredient doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_ingredient(
        &self,
        id: IngredientId,
        update: &UpdateIngredient,
    ) -> Result<Ingredient, RepositoryError> {
        let ingredient = sqlx::query_as::<_, Ingredient>(&format!(
            "UPDATE ingredient
             SET name = $1, price = $2, category = $3, is_available = $4, updated_at = now()
             WHERE id = $5
             RETURNING {INGREDIENT_COLUMNS}"
        ))
        .bind(&update.name)
        .bind(update.price)
        .bind(update.category)
        .bind(update.is_available)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(ingredient)
    }

    /// Delete an ingredient. Modification snapshots keep referencing the id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ingredient doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_ingredient(&self, id: IngredientId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM ingredient WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
