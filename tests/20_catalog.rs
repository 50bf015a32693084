mod common;

use anyhow::Result;
use reqwest::StatusCode;

const BLOCK_TYPES: [&str; 10] = [
    "header",
    "friends",
    "games",
    "achievements",
    "accounts",
    "custom",
    "about",
    "stream",
    "roster",
    "gallery",
];

#[tokio::test]
async fn block_catalog_covers_every_type() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/catalog/blocks", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK, "unexpected status: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true, "success flag false or missing: {}", body);

    let blocks = body["data"]["blocks"]
        .as_array()
        .unwrap_or_else(|| panic!("data.blocks should be an array: {}", body));

    for block_type in BLOCK_TYPES {
        let definition = blocks
            .iter()
            .find(|d| d["type"] == block_type)
            .unwrap_or_else(|| panic!("catalog is missing type {}: {}", block_type, body));

        let default_variant = definition["default_variant"]
            .as_str()
            .unwrap_or_else(|| panic!("{} has no default_variant", block_type));
        let variants = definition["variants"]
            .as_array()
            .unwrap_or_else(|| panic!("{} has no variants array", block_type));

        // The default must be one of the listed variants
        assert!(
            variants.iter().any(|v| v["name"] == default_variant),
            "{}: default variant {} is not listed",
            block_type,
            default_variant
        );
    }

    Ok(())
}

#[tokio::test]
async fn games_grid_defaults_are_published() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/catalog/blocks", server.base_url))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;

    let games = body["data"]["blocks"]
        .as_array()
        .and_then(|blocks| blocks.iter().find(|d| d["type"] == "games"))
        .unwrap_or_else(|| panic!("catalog is missing the games type: {}", body));

    let grid = games["variants"]
        .as_array()
        .and_then(|vs| vs.iter().find(|v| v["name"] == "grid"))
        .unwrap_or_else(|| panic!("games has no grid variant: {}", body));

    assert_eq!(grid["default_config"]["columns"], 3, "grid columns default: {}", body);

    Ok(())
}

#[tokio::test]
async fn theme_catalog_includes_midnight() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/catalog/themes", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK, "unexpected status: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    let presets = body["data"]["presets"]
        .as_array()
        .unwrap_or_else(|| panic!("data.presets should be an array: {}", body));

    let midnight = presets
        .iter()
        .find(|p| p["id"] == "midnight")
        .unwrap_or_else(|| panic!("midnight preset missing: {}", body));

    assert_eq!(midnight["colors"]["accent"], "#38bdf8", "midnight accent: {}", body);
    assert!(
        midnight["colors"]["background"]["from"].is_string(),
        "midnight background gradient missing: {}",
        body
    );

    // Every preset carries the full token set
    for preset in presets {
        for token in ["accent", "accent_secondary", "text", "text_secondary", "card_background", "card_border"] {
            assert!(
                preset["colors"][token].is_string(),
                "preset {} is missing color token {}",
                preset["id"],
                token
            );
        }
    }

    Ok(())
}
