//! Tests for the session controller

use super::*;
use crate::session::MockConsoleSession;
use crate::testing::ScriptedSession;

const LOGINS: &str = "Global   node1      dbuser\r\n\
                      Global   node2      ingres\r\n\
                      Global   reporting  report\r\n";

const CONNECTIONS: &str = "Private  node1   10.0.0.5     tcp_ip   II\r\n\
                           Private  node1   backup-host  tcp_ip   II7\r\n";

fn controller(session: ScriptedSession) -> Controller<ScriptedSession> {
    Controller::new(session, ControllerOptions::default())
}

fn restarting(session: ScriptedSession) -> Controller<ScriptedSession> {
    Controller::new(
        session,
        ControllerOptions {
            cursor_policy: CursorPolicy::Restart,
            ..ControllerOptions::default()
        },
    )
}

#[test]
fn test_default_options() {
    let options = ControllerOptions::default();
    assert_eq!(options.timeout, Duration::from_secs(10));
    assert_eq!(options.cursor_policy, CursorPolicy::Exhaust);
}

#[test]
fn test_next_without_show() {
    let mut ctl = controller(ScriptedSession::new());
    assert!(matches!(ctl.next_login(), Err(Error::ProtocolSequence(_))));
    assert!(matches!(
        ctl.next_connection(),
        Err(Error::ProtocolSequence(_))
    ));
}

#[tokio::test]
async fn test_show_returns_normalized_text() {
    let mut ctl = controller(ScriptedSession::new().respond("SHOW GLOBAL LOGIN *", LOGINS));
    let text = ctl.show_logins(Scope::Global, None).await.unwrap();
    assert!(text.starts_with("Global node1 dbuser\r\n"));
    assert!(!text.contains("  "));
    assert_eq!(ctl.session().sent(), ["SHOW GLOBAL LOGIN *"]);
}

#[tokio::test]
async fn test_next_login_walks_listing_then_exhausts() {
    let mut ctl = controller(ScriptedSession::new().respond("SHOW GLOBAL LOGIN *", LOGINS));
    ctl.show_logins(Scope::Global, Some("*")).await.unwrap();

    assert_eq!(ctl.next_login().unwrap(), ["Global", "node1", "dbuser"]);
    assert_eq!(ctl.next_login().unwrap(), ["Global", "node2", "ingres"]);
    assert_eq!(ctl.next_login().unwrap(), ["Global", "reporting", "report"]);
    assert!(ctl.next_login().unwrap().is_empty());
    assert!(ctl.next_login().unwrap().is_empty());
}

#[tokio::test]
async fn test_next_login_restarts_when_configured() {
    let mut ctl = restarting(ScriptedSession::new().respond("SHOW GLOBAL LOGIN *", LOGINS));
    ctl.show_logins(Scope::Global, None).await.unwrap();

    for _ in 0..3 {
        ctl.next_login().unwrap();
    }
    assert_eq!(ctl.next_login().unwrap(), ["Global", "node1", "dbuser"]);
}

#[tokio::test]
async fn test_stream_kind_must_match() {
    let mut ctl = controller(
        ScriptedSession::new().respond("SHOW PRIVATE CONNECTION NODE1 * * *", CONNECTIONS),
    );
    ctl.show_connections(Scope::Private, Some("node1"), None, None, None)
        .await
        .unwrap();

    assert!(matches!(ctl.next_login(), Err(Error::ProtocolSequence(_))));
    assert_eq!(
        ctl.next_connection().unwrap(),
        ["Private", "node1", "10.0.0.5", "tcp_ip", "II"]
    );
}

#[tokio::test]
async fn test_empty_listing() {
    let mut ctl = controller(ScriptedSession::new().respond("SHOW * LOGIN *", "\r\n"));
    let text = ctl.show_logins(Scope::Any, None).await.unwrap();
    assert_eq!(text, "\r\n");
    assert!(ctl.next_login().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_clears_buffer() {
    let mut ctl = controller(
        ScriptedSession::new()
            .respond("SHOW GLOBAL LOGIN *", LOGINS)
            .respond("CREATE GLOBAL LOGIN newnode", "Login created."),
    );
    ctl.show_logins(Scope::Global, None).await.unwrap();
    ctl.next_login().unwrap();

    let text = ctl.create_login(Scope::Global, "newnode").await.unwrap();
    assert_eq!(text, "Login created.");
    assert!(matches!(ctl.next_login(), Err(Error::ProtocolSequence(_))));
    assert_eq!(ctl.buffer().kind(), None);
}

#[tokio::test]
async fn test_destroy_clears_buffer() {
    let mut ctl = controller(ScriptedSession::new().respond("SHOW * LOGIN *", LOGINS));
    ctl.show_logins(Scope::Any, None).await.unwrap();
    ctl.destroy_login(Scope::Private, Some("node2")).await.unwrap();
    assert!(ctl.next_login().is_err());
    assert_eq!(ctl.session().sent()[1], "DESTROY PRIVATE LOGIN node2");
}

#[tokio::test]
async fn test_server_commands_keep_buffer() {
    let mut ctl = controller(
        ScriptedSession::new()
            .respond("SHOW GLOBAL LOGIN *", LOGINS)
            .respond("QUIESCE *", "Server   quiesced."),
    );
    ctl.show_logins(Scope::Global, None).await.unwrap();
    ctl.next_login().unwrap();

    assert_eq!(ctl.quiesce(None).await.unwrap(), "Server quiesced.");
    ctl.stop(Some("2817")).await.unwrap();

    assert_eq!(ctl.next_login().unwrap(), ["Global", "node2", "ingres"]);
    assert_eq!(ctl.session().sent()[2], "STOP 2817");
}

#[tokio::test]
async fn test_invalid_arguments_send_nothing() {
    let mut ctl = controller(ScriptedSession::new());

    assert!(matches!(
        ctl.create_login(Scope::Any, "node1").await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        ctl.create_login(Scope::Global, "").await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        ctl.create_connection(Scope::Private, "node1", "", "tcp_ip", "II")
            .await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        ctl.destroy_connection(Scope::Global, "*", None, None, None)
            .await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        ctl.destroy_connection(Scope::Any, "node1", None, None, None)
            .await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(ctl.session().sent().is_empty());
}

#[tokio::test]
async fn test_embedded_separators_send_nothing() {
    let mut ctl = controller(ScriptedSession::new());

    assert!(matches!(
        ctl.destroy_login(Scope::Global, Some("node1\nSTOP *")).await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        ctl.show_logins(Scope::Global, Some("a b")).await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        ctl.show_connections(Scope::Any, None, None, Some("tcp_ip\r"), None)
            .await,
        Ok(_)
    ));
    assert!(matches!(
        ctl.stop(Some("1\nDESTROY * LOGIN *")).await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        ctl.quiesce(Some("1 2")).await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        ctl.destroy_connection(Scope::Global, "node1", Some("h\nSTOP *"), None, None)
            .await,
        Err(Error::InvalidArgument(_))
    ));
    // a trailing line break is trimmed, never sent
    assert_eq!(ctl.session().sent(), ["SHOW * CONNECTION * * TCP_IP *"]);
}

#[tokio::test]
async fn test_destroy_connection_defaults_endpoint() {
    let mut ctl = controller(ScriptedSession::new());
    ctl.destroy_connection(Scope::Global, "node1", Some(""), None, Some(""))
        .await
        .unwrap();
    assert_eq!(
        ctl.session().sent(),
        ["DESTROY GLOBAL CONNECTION node1 * * *"]
    );
}

#[tokio::test]
async fn test_failed_call_leaves_buffer() {
    let mut ctl = controller(
        ScriptedSession::new()
            .respond("SHOW GLOBAL LOGIN *", LOGINS)
            .time_out_on("CREATE GLOBAL LOGIN slow"),
    );
    ctl.show_logins(Scope::Global, None).await.unwrap();

    let err = ctl.create_login(Scope::Global, "slow").await.unwrap_err();
    assert!(matches!(err, Error::SessionTimeout(10_000)));
    assert_eq!(ctl.next_login().unwrap(), ["Global", "node1", "dbuser"]);
}

#[tokio::test]
async fn test_typed_listings() {
    let mut ctl = controller(
        ScriptedSession::new()
            .respond(
                "SHOW GLOBAL LOGIN *",
                "Global  node1  dbuser\r\nNo more entries found\r\n",
            )
            .respond("SHOW * CONNECTION * * * *", CONNECTIONS),
    );

    let logins = ctl.logins(Scope::Global, None).await.unwrap();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].account, "dbuser");

    let connections = ctl
        .connections(Scope::Any, None, None, None, None)
        .await
        .unwrap();
    assert_eq!(connections.len(), 2);
    assert_eq!(connections[1].address, "backup-host");
    assert_eq!(connections[1].listen, "II7");
}

#[tokio::test]
async fn test_sends_exact_line_and_closes() {
    let mut session = MockConsoleSession::new();
    session
        .expect_send()
        .withf(|line: &str| line == "SHOW GLOBAL CONNECTION * * TCP_IP *")
        .times(1)
        .returning(|_| Ok(()));
    session
        .expect_read_until_prompt()
        .withf(|timeout: &Duration| *timeout == Duration::from_secs(3))
        .times(1)
        .returning(|_| Ok("Global  n1  h1  tcp_ip  II\r\n".to_string()));
    session.expect_close().times(1).returning(|| Ok(()));

    let mut ctl = Controller::new(
        session,
        ControllerOptions {
            timeout: Duration::from_secs(3),
            ..ControllerOptions::default()
        },
    );
    ctl.show_connections(Scope::Global, None, None, Some("tcp_ip"), None)
        .await
        .unwrap();
    assert_eq!(ctl.next_connection().unwrap().len(), 5);
    ctl.close().await.unwrap();
}

#[tokio::test]
async fn test_send_failure_propagates() {
    let mut session = MockConsoleSession::new();
    session
        .expect_send()
        .returning(|_| Err(Error::SessionClosed));
    session.expect_read_until_prompt().never();

    let mut ctl = Controller::new(session, ControllerOptions::default());
    assert!(matches!(
        ctl.stop(None).await,
        Err(Error::SessionClosed)
    ));
}
