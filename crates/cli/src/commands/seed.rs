//! Seed the menu catalog.
//!
//! Upserts the house ingredient list and pizza menu, keyed by slug, so the
//! command is safe to re-run: existing rows are refreshed, never duplicated,
//! and ids referenced by order history are preserved.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::info;

use fornaccio_core::IngredientCategory;

/// (slug, name, price in cents, category)
type IngredientSeed = (&'static str, &'static str, i64, IngredientCategory);

/// (slug, name, description, price in cents, default ingredient slugs)
type PizzaSeed = (
    &'static str,
    &'static str,
    &'static str,
    i64,
    &'static [&'static str],
);

const INGREDIENTS: &[IngredientSeed] = &[
    // Base
    ("tomato-sauce", "Sauce Tomate San Marzano", 0, IngredientCategory::Base),
    ("creme-fraiche", "Crème Fraîche", 0, IngredientCategory::Base),
    ("base-white", "Base Blanche (Crème)", 0, IngredientCategory::Base),
    // Cheese
    ("mozzarella", "Mozzarella Fior di Latte", 150, IngredientCategory::Cheese),
    ("buffalo-mozzarella", "Mozzarella di Bufala", 300, IngredientCategory::Cheese),
    ("gorgonzola", "Gorgonzola DOP", 200, IngredientCategory::Cheese),
    ("parmesan", "Parmigiano Reggiano", 150, IngredientCategory::Cheese),
    ("goat-cheese", "Chèvre Affiné", 200, IngredientCategory::Cheese),
    // Meat
    ("spicy-salami", "Spianata Piccante", 200, IngredientCategory::Meat),
    ("parma-ham", "Jambon de Parme (24 mois)", 300, IngredientCategory::Meat),
    ("cooked-ham", "Jambon Blanc aux Herbes", 200, IngredientCategory::Meat),
    ("egg", "Œuf Bio", 100, IngredientCategory::Meat),
    ("anchovies", "Anchois de Cetara", 200, IngredientCategory::Meat),
    // Vegetable
    ("basil", "Basilic Frais", 50, IngredientCategory::Vegetable),
    ("mushrooms", "Champignons de Paris", 100, IngredientCategory::Vegetable),
    ("cherry-tomatoes", "Tomates Cerises", 150, IngredientCategory::Vegetable),
    ("arugula", "Roquette", 100, IngredientCategory::Vegetable),
    ("olives", "Olives Taggiasca", 100, IngredientCategory::Vegetable),
    ("peppers", "Poivrons Grillés", 150, IngredientCategory::Vegetable),
    ("zucchini", "Courgettes", 150, IngredientCategory::Vegetable),
    ("eggplant", "Aubergines", 150, IngredientCategory::Vegetable),
    ("capers", "Câpres au Sel", 100, IngredientCategory::Vegetable),
    ("artichokes", "Cœurs d'Artichauts", 200, IngredientCategory::Vegetable),
    // Finish
    ("truffle-oil", "Huile de Truffe Blanche", 200, IngredientCategory::Finish),
    ("honey", "Miel d'Acacia", 100, IngredientCategory::Finish),
];

const PIZZAS: &[PizzaSeed] = &[
    (
        "margherita",
        "Margherita",
        "L'incontournable. Sauce tomate San Marzano, mozzarella fior di latte, basilic frais, huile d'olive vierge.",
        1200,
        &["tomato-sauce", "mozzarella", "basil"],
    ),
    (
        "diavola",
        "Diavola",
        "Pour les amateurs de piquant. Sauce tomate, mozzarella, spianata piccante, olives noires.",
        1400,
        &["tomato-sauce", "mozzarella", "spicy-salami", "olives"],
    ),
    (
        "tartufo",
        "Tartufo",
        "Élégance et saveurs. Crème de truffe, mozzarella, champignons, huile de truffe.",
        1800,
        &["creme-fraiche", "mozzarella", "mushrooms", "truffle-oil"],
    ),
    (
        "regina",
        "Regina",
        "La reine des classiques. Sauce tomate, mozzarella, jambon blanc, champignons frais.",
        1300,
        &["tomato-sauce", "mozzarella", "cooked-ham", "mushrooms"],
    ),
    (
        "4-formaggi",
        "4 Formaggi",
        "L'alliance parfaite. Mozzarella, gorgonzola, parmesan, chèvre.",
        1500,
        &["base-white", "mozzarella", "gorgonzola", "parmesan", "goat-cheese"],
    ),
    (
        "calzone",
        "Calzone",
        "Le chausson gourmand. Sauce tomate, mozzarella, jambon, œuf (à l'intérieur).",
        1400,
        &["tomato-sauce", "mozzarella", "cooked-ham", "egg"],
    ),
    (
        "vegetariana",
        "Vegetariana",
        "Fraîcheur du jardin. Sauce tomate, mozzarella, poivrons, courgettes, aubergines grillées.",
        1400,
        &["tomato-sauce", "mozzarella", "peppers", "zucchini", "eggplant"],
    ),
    (
        "napoli",
        "Napoli",
        "L'authentique. Sauce tomate, mozzarella, anchois, câpres, origan.",
        1300,
        &["tomato-sauce", "mozzarella", "anchovies", "capers"],
    ),
    (
        "capricciosa",
        "Capricciosa",
        "La capricieuse. Sauce tomate, mozzarella, jambon, champignons, artichauts, olives.",
        1500,
        &["tomato-sauce", "mozzarella", "cooked-ham", "mushrooms", "artichokes", "olives"],
    ),
];

/// Seed the catalog.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or an upsert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = fornaccio_db::create_pool(&database_url).await?;

    info!("Seeding {} ingredients...", INGREDIENTS.len());
    let mut ingredient_ids: HashMap<&str, i32> = HashMap::new();

    for (slug, name, cents, category) in INGREDIENTS {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO ingredient (slug, name, price, category)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (slug) DO UPDATE
             SET name = EXCLUDED.name,
                 price = EXCLUDED.price,
                 category = EXCLUDED.category,
                 updated_at = now()
             RETURNING id",
        )
        .bind(slug)
        .bind(name)
        .bind(Decimal::new(*cents, 2))
        .bind(*category)
        .fetch_one(&pool)
        .await?;

        ingredient_ids.insert(slug, id);
        info!("Upserted ingredient: {name}");
    }

    info!("Seeding {} pizzas...", PIZZAS.len());
    for (slug, name, description, cents, ingredient_slugs) in PIZZAS {
        let default_ingredients: Vec<i32> = ingredient_slugs
            .iter()
            .filter_map(|s| ingredient_ids.get(s).copied())
            .collect();

        sqlx::query(
            "INSERT INTO pizza (slug, name, description, base_price, image, default_ingredients)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (slug) DO UPDATE
             SET name = EXCLUDED.name,
                 description = EXCLUDED.description,
                 base_price = EXCLUDED.base_price,
                 image = EXCLUDED.image,
                 default_ingredients = EXCLUDED.default_ingredients,
                 updated_at = now()",
        )
        .bind(slug)
        .bind(name)
        .bind(description)
        .bind(Decimal::new(*cents, 2))
        .bind(format!("/pizza-{slug}.png"))
        .bind(default_ingredients)
        .execute(&pool)
        .await?;

        info!("Upserted pizza: {name}");
    }

    info!("Seeding finished.");
    Ok(())
}
