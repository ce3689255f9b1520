#![cfg(feature = "blocking")]

use mockito::{Matcher, ServerGuard};
use tencent_cmq::blocking::Account;
use tencent_cmq::{ClientConfig, CmqError, Credential, QueueMeta};

const PATH: &str = "/v2/index.php";

fn test_account(server: &ServerGuard) -> Account {
    let config = ClientConfig::default().with_endpoint(server.url());
    Account::with_config(Credential::new("AKIDtest", "test-secret-key"), config)
        .expect("failed to build account")
}

fn action(name: &str) -> Matcher {
    Matcher::UrlEncoded("Action".into(), name.into())
}

#[test]
fn blocking_create_and_delete_queue() {
    let mut server = mockito::Server::new();

    let create = server
        .mock("POST", PATH)
        .match_header("Content-Type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            action("CreateQueue"),
            Matcher::UrlEncoded("queueName".into(), "orders".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"code":0,"message":"","requestId":"req-create","queueId":"queue-1"}"#)
        .create();

    let delete = server
        .mock("POST", PATH)
        .match_body(action("DeleteQueue"))
        .with_status(200)
        .with_body(r#"{"code":4440,"message":"queue not exist","requestId":"r-1"}"#)
        .create();

    let account = test_account(&server);

    let queue_id = account
        .create_queue("orders", &QueueMeta::default())
        .expect("create_queue should succeed");
    assert_eq!(queue_id, "queue-1");

    match account.delete_queue("orders").unwrap_err() {
        CmqError::Server {
            code,
            message,
            request_id,
        } => {
            assert_eq!(code, 4440);
            assert_eq!(message, "queue not exist");
            assert_eq!(request_id, "r-1");
        }
        other => panic!("expected CmqError::Server, got: {:?}", other),
    }

    create.assert();
    delete.assert();
}

#[test]
fn blocking_message_lifecycle() {
    let mut server = mockito::Server::new();

    let send = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            action("SendMessage"),
            Matcher::UrlEncoded("msgBody".into(), "hello".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"code":0,"message":"","requestId":"req-send","msgId":"msg-1"}"#)
        .create();

    let receive = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            action("ReceiveMessage"),
            Matcher::UrlEncoded("pollingWaitSeconds".into(), "3".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"code":0,"message":"","requestId":"req-recv","msgBody":"hello","msgId":"msg-1","receiptHandle":"rh-1","enqueueTime":1700000000,"firstDequeueTime":1700000001,"nextVisibleTime":1700000031,"dequeueCount":1}"#,
        )
        .create();

    let delete = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            action("DeleteMessage"),
            Matcher::UrlEncoded("receiptHandle".into(), "rh-1".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"code":0,"message":"","requestId":"req-del"}"#)
        .create();

    let queue = test_account(&server).queue("orders");

    let msg_id = queue.send_message("hello", 0).expect("send should succeed");
    let msg = queue.receive_message(3).expect("receive should succeed");
    assert_eq!(msg.msg_id, msg_id);
    queue
        .delete_message(&msg.receipt_handle)
        .expect("delete should succeed");

    send.assert();
    receive.assert();
    delete.assert();
}

#[test]
fn blocking_batch_validation_and_empty_delete() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", PATH).expect(0).create();

    let queue = test_account(&server).queue("orders");

    let seventeen: Vec<String> = (0..17).map(|i| i.to_string()).collect();
    assert!(matches!(
        queue.batch_send_message(&seventeen, 0),
        Err(CmqError::Validation(_))
    ));
    assert!(matches!(
        queue.batch_receive_message(0, 0),
        Err(CmqError::Validation(_))
    ));

    let none: Vec<String> = Vec::new();
    queue
        .batch_delete_message(&none)
        .expect("empty batch delete should succeed");

    mock.assert();
}

#[test]
fn blocking_batch_send_keeps_short_id_list() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            action("BatchSendMessage"),
            Matcher::UrlEncoded("msgBody.1".into(), "a".into()),
            Matcher::UrlEncoded("msgBody.2".into(), "b".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"code":0,"message":"","requestId":"req-bs","msgList":[{"msgId":"m-a"}]}"#)
        .create();

    let queue = test_account(&server).queue("orders");
    let ids = queue
        .batch_send_message(&["a", "b"], 0)
        .expect("a short id list is not an error");

    assert_eq!(ids, vec!["m-a".to_string()]);
    mock.assert();
}

#[test]
fn blocking_batch_receive() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            action("BatchReceiveMessage"),
            Matcher::UrlEncoded("numOfMsg".into(), "16".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"code":0,"message":"","requestId":"req-br","msgInfoList":[{"msgBody":"x","msgId":"m-x","receiptHandle":"rh-x","enqueueTime":1,"firstDequeueTime":2,"nextVisibleTime":32,"dequeueCount":1}]}"#,
        )
        .create();

    let queue = test_account(&server).queue("orders");
    let messages = queue
        .batch_receive_message(16, 0)
        .expect("batch receive should succeed");

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].request_id, "req-br");
    mock.assert();
}
