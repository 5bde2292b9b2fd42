//! Route matching through the HTTP entry point.

mod common;

use fennec::{BuildError, HandlerSpec, HttpRequest, ServiceDescriptor};

#[test]
fn captures_bind_by_name() {
    let app = common::app();
    let response = app.handle_http(&HttpRequest::new("GET", "/users/42"));
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "hello user 42");
}

#[test]
fn literal_segments_match_case_insensitively() {
    let app = common::app();
    let response = app.handle_http(&HttpRequest::new("GET", "/USERS/42"));
    assert_eq!(response.status, 200);
}

#[test]
fn query_strings_are_ignored_for_matching() {
    let app = common::app();
    let response = app.handle_http(&HttpRequest::new("GET", "/users/42?verbose=1"));
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "hello user 42");
}

#[test]
fn captures_are_url_decoded() {
    let app = common::app();
    let response = app.handle_http(&HttpRequest::new("GET", "/users/ren%C3%A9e"));
    assert_eq!(response.body, "hello user renée");
}

#[test]
fn segment_count_mismatch_is_not_found() {
    let app = common::app();
    assert_eq!(app.handle_http(&HttpRequest::new("GET", "/users")).status, 404);
    assert_eq!(
        app.handle_http(&HttpRequest::new("GET", "/users/42/posts")).status,
        404
    );
}

#[test]
fn empty_captures_do_not_match() {
    let app = common::app();
    let response = app.handle_http(&HttpRequest::new("GET", "/users/"));
    assert_eq!(response.status, 404);
}

#[test]
fn earlier_registrations_win_overlapping_paths() {
    struct Special;
    struct Fallback;

    let app = fennec::App::builder()
        .service(
            ServiceDescriptor::controller("Special", "/items/featured")
                .autowire(|_| Ok(Special))
                .handler(HandlerSpec::new::<Special, _>("GET", Vec::new(), |_, _| {
                    Ok("special".into())
                })),
        )
        .service(
            ServiceDescriptor::controller("Fallback", "/items/{id}")
                .autowire(|_| Ok(Fallback))
                .handler(HandlerSpec::new::<Fallback, _>("GET", Vec::new(), |_, _| {
                    Ok("fallback".into())
                })),
        )
        .build()
        .unwrap();

    assert_eq!(
        app.handle_http(&HttpRequest::new("GET", "/items/featured")).body,
        "special"
    );
    assert_eq!(
        app.handle_http(&HttpRequest::new("GET", "/items/anything")).body,
        "fallback"
    );
}

#[test]
fn duplicate_route_templates_fail_the_boot() {
    struct One;
    struct Two;

    let err = fennec::App::builder()
        .service(
            ServiceDescriptor::controller("One", "/ping")
                .autowire(|_| Ok(One))
                .handler(HandlerSpec::new::<One, _>("GET", Vec::new(), |_, _| {
                    Ok("one".into())
                })),
        )
        .service(
            ServiceDescriptor::controller("Two", "/ping")
                .autowire(|_| Ok(Two))
                .handler(HandlerSpec::new::<Two, _>("GET", Vec::new(), |_, _| {
                    Ok("two".into())
                })),
        )
        .build()
        .unwrap_err();

    assert!(matches!(err, BuildError::DuplicateRoute(template) if template == "/ping"));
}

#[test]
fn malformed_route_templates_fail_the_boot() {
    struct Bad;

    let err = fennec::App::builder()
        .service(
            ServiceDescriptor::controller("Bad", "/items/{id")
                .autowire(|_| Ok(Bad))
                .handler(HandlerSpec::new::<Bad, _>("GET", Vec::new(), |_, _| {
                    Ok("bad".into())
                })),
        )
        .build()
        .unwrap_err();

    assert!(matches!(err, BuildError::InvalidRoute { .. }));
}
