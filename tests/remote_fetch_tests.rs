use cooknow::catalog::Catalog;
use cooknow::mealdb::{MealDbClient, MealDbError};
use cooknow::store::{RecipeStore, StoreEvent};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const API_PATH: &str = "/api/json/v1/1";

const ONE_MEAL: &str = r#"{"meals":[{"idMeal":"7","strMeal":"Pasta al Forno","strInstructions":"Boil.\r\nBake.","strIngredient1":"Rigatoni","strIngredient2":"Tomato passata","strIngredient3":""}]}"#;

const TWO_MEALS: &str = r#"{"meals":[
    {"idMeal":"8","strMeal":"Shakshuka","strIngredient1":"Eggs","strIngredient2":"Tomatoes"},
    {"idMeal":"9","strMeal":"Dal","strIngredient1":"Red lentils"}
]}"#;

/// Serves one canned `(status, body)` reply per incoming connection, in order.
/// The handle resolves to the request line of every request received.
async fn serve_canned(
    replies: Vec<(u16, &'static str)>,
) -> std::io::Result<(String, JoinHandle<std::io::Result<Vec<String>>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}{}", listener.local_addr()?, API_PATH);

    let handle = tokio::spawn(async move {
        let mut request_lines = Vec::new();
        for (status, body) in replies {
            let (mut socket, _) = listener.accept().await?;

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let text = String::from_utf8_lossy(&request);
            request_lines.push(text.lines().next().unwrap_or_default().to_string());

            let reason = if status == 200 { "OK" } else { "Internal Server Error" };
            let reply = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await?;
            socket.shutdown().await?;
        }
        Ok(request_lines)
    });

    Ok((base_url, handle))
}

fn remote_ids(store: &RecipeStore) -> Vec<&str> {
    store.remote_recipes().iter().map(|r| r.id.as_str()).collect()
}

#[tokio::test]
async fn test_fetch_replaces_pool_and_keeps_it_on_bad_responses() -> anyhow::Result<()> {
    let (base_url, server) = serve_canned(vec![
        (200, ONE_MEAL),
        (200, r#"{"meals":null}"#),
        (500, "upstream exploded"),
        (200, "<html>not json</html>"),
        (200, TWO_MEALS),
    ])
    .await?;
    let client = MealDbClient::new(base_url);
    let mut store = RecipeStore::new(Catalog::bundled()?);

    assert_eq!(store.fetch_from_remote(&client, Some(" pasta ")).await, 1);
    assert_eq!(remote_ids(&store), vec!["api-7"]);
    let pasta = store.get_recipe_by_id("api-7").expect("fetched recipe is reachable");
    assert_eq!(pasta.instructions, "1. Boil.\n2. Bake.");
    assert_eq!(pasta.ingredients.len(), 2);

    // no matches, server failure and an undecodable body all leave the pool alone
    assert_eq!(store.fetch_from_remote(&client, Some("nothing")).await, 0);
    assert_eq!(remote_ids(&store), vec!["api-7"]);
    assert_eq!(store.fetch_from_remote(&client, Some("pasta")).await, 0);
    assert_eq!(remote_ids(&store), vec!["api-7"]);
    assert_eq!(store.fetch_from_remote(&client, Some("pasta")).await, 0);
    assert_eq!(remote_ids(&store), vec!["api-7"]);

    assert_eq!(store.fetch_from_remote(&client, None).await, 2);
    assert_eq!(remote_ids(&store), vec!["api-8", "api-9"]);
    assert!(store.get_recipe_by_id("api-7").is_none());

    let replaced = store
        .events()
        .iter()
        .filter(|e| matches!(e, StoreEvent::RemoteReplaced { .. }))
        .count();
    assert_eq!(replaced, 2);

    let request_lines = server.await??;
    assert_eq!(request_lines.len(), 5);
    assert!(request_lines
        .iter()
        .all(|line| line.starts_with(&format!("GET {}/search.php?s=", API_PATH))));
    assert!(request_lines[0].contains("s=pasta "));
    assert!(request_lines[4].contains("s= "));
    Ok(())
}

#[tokio::test]
async fn test_fetched_recipes_join_suggestions() -> anyhow::Result<()> {
    let (base_url, server) = serve_canned(vec![(200, TWO_MEALS)]).await?;
    let client = MealDbClient::new(base_url);
    let mut store = RecipeStore::new(Catalog::bundled()?);

    assert_eq!(store.fetch_from_remote(&client, Some("eggs")).await, 2);
    let suggested = store.suggest_recipes(&["lentil"]);
    assert_eq!(suggested.len(), 1);
    assert_eq!(suggested[0].id, "api-9");

    server.await??;
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_api_error() -> anyhow::Result<()> {
    let (base_url, server) = serve_canned(vec![(500, "upstream exploded")]).await?;
    let client = MealDbClient::new(base_url);

    match client.search("pasta").await {
        Err(MealDbError::ApiError { status, error_body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(error_body, "upstream exploded");
        }
        other => panic!("expected an API error, got {:?}", other),
    }

    server.await??;
    Ok(())
}

#[tokio::test]
async fn test_undecodable_body_is_serialization_error() -> anyhow::Result<()> {
    let (base_url, server) = serve_canned(vec![(200, "<html>not json</html>")]).await?;
    let client = MealDbClient::new(base_url);

    let result = client.search("pasta").await;
    assert!(matches!(result, Err(MealDbError::SerializationError(_))));

    server.await??;
    Ok(())
}
