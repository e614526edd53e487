use mockito::{Matcher, Server};
use routechat_persist::{PersistError, ProjectStore, SupabaseProjectStore};
use serde_json::json;

fn store_for(server: &Server) -> SupabaseProjectStore {
    SupabaseProjectStore::builder()
        .url(server.url())
        .key("service-key")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_list_projects() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/projects")
        .match_header("apikey", "service-key")
        .match_header("authorization", "Bearer service-key")
        .match_query(Matcher::UrlEncoded("select".into(), "name".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{"name": "checkout-service"}, {"name": "orders"}]).to_string())
        .create_async()
        .await;

    let projects = store_for(&server).list_projects().await.unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "checkout-service");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_routes_filters_by_name() {
    let mut server = Server::new_async().await;
    let routes = json!({"routes": [{"path": "/cart", "method": "POST"}]});
    let mock = server
        .mock("GET", "/rest/v1/projects")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "routes".into()),
            Matcher::UrlEncoded("name".into(), "eq.checkout-service".into()),
        ]))
        .with_status(200)
        .with_body(json!([{ "routes": routes }]).to_string())
        .create_async()
        .await;

    let fetched = store_for(&server).get_routes("checkout-service").await.unwrap();

    assert_eq!(fetched, routes);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_first_record_wins() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/rest/v1/projects")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([{"routes": ["first"]}, {"routes": ["second"]}]).to_string())
        .create_async()
        .await;

    let fetched = store_for(&server).get_routes("dup").await.unwrap();
    assert_eq!(fetched, json!(["first"]));
}

#[tokio::test]
async fn test_empty_result_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/rest/v1/projects")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let err = store_for(&server).get_routes("ghost").await.unwrap_err();
    assert!(matches!(err, PersistError::ProjectNotFound(name) if name == "ghost"));
}

#[tokio::test]
async fn test_null_routes_is_missing() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/rest/v1/projects")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([{"routes": null}]).to_string())
        .create_async()
        .await;

    let err = store_for(&server).get_routes("draft").await.unwrap_err();
    assert!(matches!(err, PersistError::RoutesMissing(_)));
}

#[tokio::test]
async fn test_bad_key_is_unauthorized() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/rest/v1/projects")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(json!({"message": "Invalid API key"}).to_string())
        .create_async()
        .await;

    let err = store_for(&server).list_projects().await.unwrap_err();
    assert!(matches!(err, PersistError::Unauthorized(_)));
}
