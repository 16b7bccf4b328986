use std::sync::Arc;

use axum::http::StatusCode;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    units::{catalog::decode_catalog, Catalog},
    Resp,
};

use super::{build_draft_pool, DraftConfig, DraftTable};

#[derive(serde::Serialize)]
struct DraftResp {
    success: bool,

    /// Seed the draft was rolled with. Sending it back rolls the same draft.
    seed: u64,

    total_cost: u32,
    pool: DraftTable,
}

pub async fn handle_draft_request(
    catalog: Arc<Catalog>,
    mut data: axum::extract::Multipart,
) -> axum::response::Response<String> {
    let mut custom_catalog = None;
    let mut expansions = Vec::new();
    let mut config = DraftConfig::default();
    let mut seed = None;
    while let Ok(Some(field)) = data.next_field().await {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name == "catalog" {
            match field.bytes().await {
                Ok(bytes) => match decode_catalog(bytes) {
                    Ok(custom) => custom_catalog = Some(custom),
                    Err(e) => return Resp::e422(format!("Failed to load unit catalog: {e}")),
                },
                Err(e) => return Resp::e500(e),
            }
            continue;
        }

        let s = match field.text().await {
            Ok(s) => s.trim().to_string(),
            Err(e) => return Resp::e500(e),
        };

        match field_name.as_str() {
            "expansion" if !s.is_empty() => expansions.push(s),
            "draft_size" => match s.parse::<u32>() {
                Ok(n) => config.draft_size = n,
                Err(_) => return Resp::e422(format!("Invalid draft size: {s}")),
            },
            "gods" => match s.parse::<usize>() {
                Ok(n) => config.gods = n,
                Err(_) => return Resp::e422(format!("Invalid number of gods: {s}")),
            },
            "titans" => match s.parse::<usize>() {
                Ok(n) => config.titans = n,
                Err(_) => return Resp::e422(format!("Invalid number of titans: {s}")),
            },
            "seed" if !s.is_empty() => match s.parse::<u64>() {
                Ok(n) => seed = Some(n),
                Err(_) => return Resp::e422(format!("Invalid seed: {s}")),
            },
            _ => {}
        }
    }

    let merged;
    let catalog = match custom_catalog {
        Some(custom) => {
            let mut catalog = (*catalog).clone();
            catalog.merge(custom);
            merged = catalog;
            &merged
        }
        None => &*catalog,
    };

    let units = if expansions.is_empty() {
        catalog.all_units()
    } else {
        match catalog.units(&expansions) {
            Ok(units) => units,
            Err(e) => return Resp::e422(e),
        }
    };

    let seed = seed.unwrap_or_else(rand::random);
    tracing::debug!(
        "Rolling draft of {} units with seed {seed} and {config:?}.",
        units.len()
    );

    match build_draft_pool(&units, &config, &mut StdRng::seed_from_u64(seed)) {
        Ok(pool) => {
            let pool = DraftTable::new(pool);
            Resp::json(
                &DraftResp {
                    success: true,
                    seed,
                    total_cost: pool.total_cost(),
                    pool,
                },
                StatusCode::OK,
            )
        }
        Err(e) => {
            tracing::warn!("Failed to roll draft with seed {seed}: {e}");
            Resp::e422(e)
        }
    }
}

pub async fn handle_expansions_request(catalog: Arc<Catalog>) -> axum::response::Response<String> {
    Resp::json(&catalog.names(), StatusCode::OK)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::units::Catalog;

    const BOUNDARY: &str = "mythicdraftboundary";

    fn multipart(fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/api/draft")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let app = crate::router(Arc::new(Catalog::builtin().unwrap()));
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn column_len(body: &Value, column: &str) -> usize {
        body["pool"][column].as_array().map_or(0, Vec::len)
    }

    #[tokio::test]
    async fn test_list_expansions() {
        let request = Request::builder()
            .uri("/api/expansions")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);

        let names = body.as_array().unwrap();
        assert_eq!(names.len(), 27);
        assert!(names.iter().any(|n| n == "Duat"));
    }

    #[tokio::test]
    async fn test_draft() {
        let fields = [
            ("draft_size", "20"),
            ("gods", "3"),
            ("titans", "1"),
            ("seed", "5"),
        ];
        let (status, body) = send(multipart(&fields)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["seed"], 5);
        assert_eq!(body["total_cost"], 20);
        assert_eq!(column_len(&body, "titans"), 1);
        assert_eq!(column_len(&body, "gods"), 3);

        let (_, again) = send(multipart(&fields)).await;
        assert_eq!(body, again);
    }

    #[tokio::test]
    async fn test_draft_expansions() {
        let fields = [
            ("expansion", "MBP Core"),
            ("expansion", "pandora's box"),
            ("draft_size", "10"),
            ("gods", "2"),
        ];
        let (status, body) = send(multipart(&fields)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_cost"], 10);
        assert_eq!(column_len(&body, "titans"), 0);
        assert!(body["seed"].is_u64());
    }

    #[tokio::test]
    async fn test_invalid_fields() {
        let (status, body) = send(multipart(&[("draft_size", "lots")])).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);

        let (status, body) = send(multipart(&[("expansion", "Atlantis")])).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().unwrap().contains("Atlantis"));
    }

    #[tokio::test]
    async fn test_insufficient_units() {
        let fields = [("expansion", "Duat"), ("gods", "3"), ("draft_size", "2")];
        let (status, body) = send(multipart(&fields)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().unwrap().contains("gods"));
    }

    #[tokio::test]
    async fn test_custom_catalog() {
        let catalog = r#"[{"name": "Homebrew", "units": [
            {"name": "Talos", "category": "titan", "cost": 8},
            {"name": "Hecate", "category": "god", "cost": 6},
            {"name": "Bronze Men", "category": "troop"},
            {"name": "Cretans", "category": "troop"},
            {"name": "Argonauts", "category": "troop"}
        ]}]"#;
        let fields = [
            ("catalog", catalog),
            ("expansion", "Homebrew"),
            ("titans", "1"),
            ("gods", "1"),
            ("draft_size", "3"),
        ];
        let (status, body) = send(multipart(&fields)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pool"]["titans"][0]["name"], "Talos");
        assert_eq!(body["pool"]["gods"][0]["name"], "Hecate");
        assert_eq!(column_len(&body, "troops"), 3);

        let (status, _) = send(multipart(&[("catalog", "not json")])).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
