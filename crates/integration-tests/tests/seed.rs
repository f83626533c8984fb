//! Integration tests for the sample recipe catalogue.

use axum::http::StatusCode;
use serde_json::json;

use recipe_box_core::RecipeId;
use recipe_box_integration_tests::TestContext;
use recipe_box_server::db::RecipeRepository;
use recipe_box_server::db::seed::{self, SeedOutcome};

#[tokio::test]
async fn test_seeded_catalogue_is_listed() {
    let ctx = TestContext::seeded().await;

    let resp = ctx.get("/recipes").await;

    assert_eq!(resp.status, StatusCode::OK);
    let list = resp.body.as_array().unwrap();
    assert_eq!(list.len(), 7);
    assert_eq!(list[0]["id"], "seed-1");
    assert_eq!(list[0]["title"], "Thai Red Curry Fried Rice");
    assert_eq!(list[0]["cookTime"], serde_json::Value::Null);
    assert_eq!(list[5]["tags"], json!(["Breakfast", "Quick", "Healthy"]));
}

#[tokio::test]
async fn test_detailed_seed_recipe() {
    let ctx = TestContext::seeded().await;

    let resp = ctx.get("/recipes/seed-detailed-1").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["ingredients"].as_array().unwrap().len(), 8);
    assert_eq!(resp.body["ingredients"][0]["name"], "jasmine rice");
    let steps: Vec<i64> = resp.body["instructions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["stepNumber"].as_i64().unwrap())
        .collect();
    assert_eq!(steps, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(
        resp.body["nutritionFacts"],
        json!([{
            "id": resp.body["nutritionFacts"][0]["id"],
            "name": "Nutrition Facts",
            "quantity": "450 calories, 25g protein, 60g carbs, 12g fat"
        }])
    );
}

#[tokio::test]
async fn test_seed_skips_populated_store() {
    let ctx = TestContext::new().await;
    ctx.post("/recipes", &recipe_box_integration_tests::recipe_body("Mine", &[]))
        .await;

    let outcome = seed::seed_if_empty(&ctx.pool).await.unwrap();

    assert_eq!(outcome, SeedOutcome::AlreadyPopulated);
    assert_eq!(ctx.count("recipe").await, 1);
}

#[tokio::test]
async fn test_seed_recipes_reconcile_like_any_other() {
    let ctx = TestContext::seeded().await;
    let before = ctx.get("/recipes/seed-detailed-1").await;
    let rice_id = before.body["ingredients"][0]["id"].clone();

    let resp = ctx
        .put(
            "/recipes/seed-detailed-1",
            &json!({"ingredients": [{"name": "jasmine rice", "quantity": "2 cups"}]}),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["ingredients"], json!([{
        "id": rice_id,
        "name": "jasmine rice",
        "quantity": "2 cups"
    }]));

    let repo = RecipeRepository::new(&ctx.pool);
    let detail = repo
        .get(&RecipeId::new("seed-detailed-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.ingredients.len(), 1);
    assert_eq!(detail.instructions.len(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_seeding_inserts_catalogue_once() {
    let ctx = TestContext::file_backed().await;

    let (first, second) = tokio::join!(
        seed::seed_if_empty(&ctx.pool),
        seed::seed_if_empty(&ctx.pool)
    );
    let mut outcomes = [first.unwrap(), second.unwrap()];
    outcomes.sort_by_key(|outcome| matches!(outcome, SeedOutcome::AlreadyPopulated));

    assert!(matches!(outcomes[0], SeedOutcome::Seeded(7)));
    assert!(matches!(outcomes[1], SeedOutcome::AlreadyPopulated));
    assert_eq!(ctx.count("recipe").await, 7);
}
