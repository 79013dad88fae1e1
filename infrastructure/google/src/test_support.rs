use std::sync::Arc;

use business::domain::logger::Logger;
use business::domain::menu::value_objects::MenuImage;
use logger::TracingLogger;
use poem::listener::{Acceptor, Listener, TcpListener};
use poem::{Endpoint, Server};

use crate::client::GoogleClient;

/// Serves `app` on an ephemeral port and returns a client pointed at it.
pub async fn fake_google<E>(app: E) -> Arc<GoogleClient>
where
    E: Endpoint + 'static,
{
    let acceptor = TcpListener::bind("127.0.0.1:0")
        .into_acceptor()
        .await
        .unwrap();
    let addr = *acceptor.local_addr()[0].as_socket_addr().unwrap();
    tokio::spawn(Server::new_with_acceptor(acceptor).run(app));

    Arc::new(GoogleClient::with_base_url(&format!("http://{}", addr)))
}

/// A client whose endpoints refuse connections.
pub fn unreachable_google() -> Arc<GoogleClient> {
    Arc::new(GoogleClient::with_base_url("http://127.0.0.1:1"))
}

pub fn test_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}

pub fn menu_image() -> MenuImage {
    // "hello menu" in base64
    MenuImage::parse(Some("data:image/png;base64,aGVsbG8gbWVudQ==")).unwrap()
}
