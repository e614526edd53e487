use mockito::{Matcher, Server};
use routechat_llm::{
    AssistantClient, AssistantError, ListOrder, MessageRole, NewMessage, OpenAIAssistantClient,
    OpenAIConfig, RetryPolicy, RunStatus, ASSISTANTS_PURPOSE,
};
use serde_json::json;

fn client_for(server: &Server) -> OpenAIAssistantClient {
    OpenAIAssistantClient::from_config(OpenAIConfig::new("sk-test").with_base_url(server.url()))
        .unwrap()
        .with_retry_policy(RetryPolicy::none())
}

#[tokio::test]
async fn test_upload_file_sends_multipart_with_purpose() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/files")
        .match_header("authorization", "Bearer sk-test")
        .match_header("openai-beta", "assistants=v2")
        .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("chunk1.txt".into()),
            Matcher::Regex("assistants".into()),
            Matcher::Regex(r#"\{"routes": \[\]\}"#.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "file-abc",
                "object": "file",
                "bytes": 14,
                "filename": "chunk1.txt",
                "purpose": "assistants"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let file = client
        .upload_file(br#"{"routes": []}"#.to_vec(), "chunk1.txt", ASSISTANTS_PURPOSE)
        .await
        .unwrap();

    assert_eq!(file.id, "file-abc");
    assert_eq!(file.filename, "chunk1.txt");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_thread_and_run_attaches_files_in_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/runs")
        .match_body(Matcher::PartialJson(json!({
            "assistant_id": "asst_1",
            "thread": {
                "messages": [{
                    "role": "user",
                    "content": "hello",
                    "attachments": [
                        {"file_id": "file-1", "tools": [{"type": "file_search"}]},
                        {"file_id": "file-2", "tools": [{"type": "file_search"}]}
                    ]
                }]
            }
        })))
        .with_status(200)
        .with_body(
            json!({
                "id": "run_1",
                "object": "thread.run",
                "thread_id": "thread_1",
                "assistant_id": "asst_1",
                "status": "queued"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let message = NewMessage::user("hello").with_file_ids(["file-1", "file-2"]);
    let run = client.create_thread_and_run("asst_1", message).await.unwrap();

    assert_eq!(run.id, "run_1");
    assert_eq!(run.thread_id, "thread_1");
    assert_eq!(run.status, RunStatus::Queued);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_continue_thread_posts_message_then_run() {
    let mut server = Server::new_async().await;
    let message_mock = server
        .mock("POST", "/threads/thread_1/messages")
        .match_body(Matcher::Json(json!({"role": "user", "content": "next question"})))
        .with_status(200)
        .with_body(
            json!({
                "id": "msg_2",
                "thread_id": "thread_1",
                "role": "user",
                "content": [{"type": "text", "text": {"value": "next question", "annotations": []}}],
                "created_at": 1700000000
            })
            .to_string(),
        )
        .create_async()
        .await;
    let run_mock = server
        .mock("POST", "/threads/thread_1/runs")
        .match_body(Matcher::Json(json!({"assistant_id": "asst_1"})))
        .with_status(200)
        .with_body(json!({"id": "run_2", "thread_id": "thread_1", "status": "queued"}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let msg = client
        .create_message("thread_1", NewMessage::user("next question"))
        .await
        .unwrap();
    let run = client.create_run("thread_1", "asst_1").await.unwrap();

    assert_eq!(msg.role, MessageRole::User);
    assert_eq!(msg.text(), "next question");
    assert_eq!(run.id, "run_2");
    message_mock.assert_async().await;
    run_mock.assert_async().await;
}

#[tokio::test]
async fn test_get_run_parses_unknown_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/threads/thread_1/runs/run_1")
        .with_status(200)
        .with_body(json!({"id": "run_1", "thread_id": "thread_1", "status": "warming_up"}).to_string())
        .create_async()
        .await;

    let run = client_for(&server).get_run("thread_1", "run_1").await.unwrap();
    assert_eq!(run.status, RunStatus::Unknown);
    assert!(!run.status.is_terminal());
}

#[tokio::test]
async fn test_cancel_run_posts_to_cancel_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/thread_1/runs/run_1/cancel")
        .match_header("openai-beta", "assistants=v2")
        .with_status(200)
        .with_body(json!({"id": "run_1", "thread_id": "thread_1", "status": "cancelling"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let run = client_for(&server).cancel_run("thread_1", "run_1").await.unwrap();
    assert_eq!(run.status, RunStatus::Cancelling);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_messages_requests_descending_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/threads/thread_1/messages")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("order".into(), "desc".into()),
            Matcher::UrlEncoded("limit".into(), "100".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "object": "list",
                "data": [
                    {
                        "id": "msg_2",
                        "role": "assistant",
                        "content": [
                            {"type": "image_file", "image_file": {"file_id": "file-img"}},
                            {"type": "text", "text": {"value": "GET /users lists users", "annotations": []}}
                        ],
                        "created_at": 2
                    },
                    {
                        "id": "msg_1",
                        "role": "user",
                        "content": [{"type": "text", "text": {"value": "what routes?", "annotations": []}}],
                        "created_at": 1
                    }
                ],
                "has_more": false
            })
            .to_string(),
        )
        .create_async()
        .await;

    let messages = client_for(&server)
        .list_messages("thread_1", ListOrder::Desc)
        .await
        .unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::Assistant);
    assert_eq!(messages[0].text(), "GET /users lists users");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_is_typed() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/threads/thread_1/runs/run_1")
        .with_status(401)
        .with_body(json!({"error": {"message": "Incorrect API key provided"}}).to_string())
        .create_async()
        .await;

    let err = client_for(&server).get_run("thread_1", "run_1").await.unwrap_err();
    match err {
        AssistantError::Unauthorized(msg) => assert_eq!(msg, "Incorrect API key provided"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/threads/thread_1/runs")
        .with_status(429)
        .with_header("retry-after", "7")
        .with_body(json!({"error": {"message": "Rate limit reached"}}).to_string())
        .create_async()
        .await;

    let err = client_for(&server).create_run("thread_1", "asst_1").await.unwrap_err();
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(7)));
}

#[tokio::test]
async fn test_missing_thread_is_not_found() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/threads/thread_gone/messages")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(json!({"error": {"message": "No thread found with id 'thread_gone'."}}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = OpenAIAssistantClient::from_config(
        OpenAIConfig::new("sk-test").with_base_url(server.url()),
    )
    .unwrap();
    let err = client
        .list_messages("thread_gone", ListOrder::Desc)
        .await
        .unwrap_err();

    assert!(matches!(err, AssistantError::NotFound(_)));
    // not-found is never retried, even with the default policy
    mock.assert_async().await;
}
