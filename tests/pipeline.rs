//! End-to-end pipeline tests: select → render → publish → derived link,
//! against a mock upload endpoint.

use std::io::Cursor;

use image::{Rgba, RgbaImage};

use pixpost::{
    CloudConfig, Error, MosaicConfig, PublishConfig, PublishState, Session, Transformations,
};

fn serve_once(status: u16, body: &'static str) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response = tiny_http::Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
        }
    });
    format!("http://{}/api/upload", addr)
}

fn cat_png() -> Vec<u8> {
    let src = RgbaImage::from_fn(40, 30, |x, y| Rgba([x as u8 * 6, y as u8 * 8, 128, 255]));
    let mut buf = Cursor::new(Vec::new());
    src.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn session_for(endpoint: String) -> Session {
    Session::new(
        MosaicConfig { sample_size: 5, ..Default::default() },
        PublishConfig { endpoint, timeout_ms: 5000, ..Default::default() },
        CloudConfig::default(),
    )
    .expect("failed to create session")
}

#[test]
fn happy_path_publishes_and_derives_link() {
    let endpoint = serve_once(200, r#"{"data": "https://host/img123.png"}"#);
    let mut session = session_for(endpoint);

    session.select_file(cat_png());
    let mosaic = session.render().expect("selection staged");
    assert_eq!(mosaic.width(), 500);
    assert_eq!(mosaic.height(), 300);

    let link = session.publish().expect("publish failed");
    assert_eq!(link.url, "https://host/img123.png");
    assert_eq!(
        session.publish_state(),
        &PublishState::Succeeded(session.published_link().unwrap().clone())
    );

    let blurred = session
        .derived_link(&Transformations { effect: Some("blur:10".into()), quality: Some(1) })
        .expect("derived link after success");
    assert_eq!(
        blurred.url,
        "https://res.cloudinary.com/dogjmmett/image/upload/e_blur:10,q_1/img123.png"
    );
}

#[test]
fn transport_failure_leaves_no_link() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut session = session_for(format!("http://127.0.0.1:{}/api/upload", port));

    session.select_file(cat_png());
    let err = session.publish().unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {:?}", err);

    // Failure is recorded in state; no link, no derived link
    assert!(matches!(session.publish_state(), PublishState::Failed(_)));
    assert!(session.published_link().is_none());
    let blur = Transformations { effect: Some("blur:10".into()), quality: Some(1) };
    assert!(session.derived_link(&blur).is_none());
}

#[test]
fn protocol_failure_is_recorded_in_state() {
    let endpoint = serve_once(200, r#"{"unexpected": true}"#);
    let mut session = session_for(endpoint);

    session.select_file(cat_png());
    let err = session.publish().unwrap_err();
    assert!(matches!(err, Error::Protocol(_)), "got {:?}", err);
    assert!(matches!(session.publish_state(), PublishState::Failed(_)));
}

#[test]
fn failed_state_allows_retriggering() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut session = session_for(format!("http://127.0.0.1:{}/api/upload", port));

    session.select_file(cat_png());
    assert!(session.publish().is_err());
    assert!(session.publish_state().can_trigger());

    // A failed publish may be triggered again (and fail again the same way)
    assert!(session.publish().is_err());
}

#[test]
fn reselection_resets_the_outcome() {
    let endpoint = serve_once(200, r#"{"data": "https://host/img123.png"}"#);
    let mut session = session_for(endpoint);

    session.select_file(cat_png());
    session.publish().expect("publish failed");
    assert!(session.published_link().is_some());

    // Selecting a new source supersedes the published outcome
    session.select_file(cat_png());
    assert_eq!(session.publish_state(), &PublishState::Idle);
    assert!(session.published_link().is_none());
}
