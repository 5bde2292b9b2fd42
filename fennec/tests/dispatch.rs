//! Dispatch semantics: verbs, replies, bodies, and pre-hooks.

mod common;

use fennec::testing::{DenyingAction, RecordingAction};
use fennec::{
    AppConfig, ContainerConfig, HttpRequest, ServiceDescriptor,
};

#[test]
fn plain_replies_are_text_with_status_200() {
    let app = common::app();
    let response = app.handle_http(&HttpRequest::new("GET", "/users/7"));
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "text/plain");
}

#[test]
fn envelope_replies_keep_their_status_and_content_type() {
    let app = common::app();
    let request = HttpRequest::new("POST", "/users/7").with_body(r#"{"name":"Ada"}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 201);
    assert_eq!(response.content_type, "application/json");
}

#[test]
fn unhandled_verbs_are_405() {
    let app = common::app();
    let response = app.handle_http(&HttpRequest::new("DELETE", "/users/7"));
    assert_eq!(response.status, 405);
    assert_eq!(response.body, "Error 405");
}

#[test]
fn verb_lookup_ignores_request_casing() {
    let app = common::app();
    assert_eq!(app.handle_http(&HttpRequest::new("get", "/users/7")).status, 200);
    assert_eq!(app.handle_http(&HttpRequest::new("GeT", "/users/7")).status, 200);
}

#[test]
fn untyped_body_parameters_receive_the_raw_payload() {
    let app = common::app();
    let request = HttpRequest::new("PUT", "/users/7").with_body(r#"{"anything":["goes",1]}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 200);
    let value: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(value["anything"][0], "goes");
}

#[test]
fn unparseable_bodies_bind_as_nothing() {
    let app = common::app();
    let request = HttpRequest::new("PUT", "/users/7").with_body("not json at all");
    let response = app.handle_http(&request);
    assert_eq!(response.status, 200);
    assert_eq!(response.body.trim(), "null");
}

#[test]
fn form_fields_take_precedence_over_the_raw_body() {
    let app = common::app();
    let request = HttpRequest::new("POST", "/users/7")
        .form_field("name", "Form+Ada")
        .with_body(r#"{"name":"Body Ada"}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 201);
    let value: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(value["name"], "Form Ada");
}

#[test]
fn get_requests_never_bind_a_body() {
    let app = common::app();
    let request = HttpRequest::new("GET", "/users/7").with_body(r#"{"name":"ignored"}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "hello user 7");
}

fn app_with_hooks(hooks: Vec<ServiceDescriptor>, hook_ids: &[&str]) -> fennec::App {
    let mut config = common::base_config();
    for id in hook_ids {
        config = config.before_action(*id);
    }
    let mut builder = fennec::App::builder()
        .config(config)
        .container_config(ContainerConfig::singleton());
    for descriptor in common::service_descriptors() {
        builder = builder.service(descriptor);
    }
    for descriptor in common::data_descriptors() {
        builder = builder.data_type(descriptor);
    }
    for hook in hooks {
        builder = builder.service(hook);
    }
    builder.build().unwrap()
}

/// Wire the fixture by hand so the test can keep one container and inspect
/// the pre-hook instance the dispatcher actually called.
fn dispatcher_fixture(hook_ids: &[&str]) -> (fennec::Dispatcher, fennec::Container) {
    use std::sync::Arc;

    let mut descriptors = common::service_descriptors();
    descriptors.push(
        ServiceDescriptor::service("RecordingAction")
            .autowire(|_| Ok(RecordingAction::new()))
            .before_action_as::<RecordingAction>(),
    );
    let plans = Arc::new(fennec::FactoryBuilder::new(descriptors).build().unwrap());

    let mut binder = fennec::BinderBuilder::new();
    for descriptor in common::data_descriptors() {
        binder.register(descriptor).unwrap();
    }

    let mut config = common::base_config();
    for id in hook_ids {
        config = config.before_action(*id);
    }

    let dispatcher = fennec::Dispatcher::new(plans.clone(), Arc::new(binder.build()));
    let container = fennec::Container::new(
        plans,
        ContainerConfig::singleton(),
        Arc::new(config),
    );
    (dispatcher, container)
}

#[test]
fn pre_hooks_observe_the_pending_invocation() {
    let (dispatcher, container) = dispatcher_fixture(&["RecordingAction"]);

    let request = HttpRequest::new("POST", "/users/7").with_body(r#"{"name":"Ada"}"#);
    let response = dispatcher.dispatch(&container, &request).unwrap();
    assert_eq!(response.status, 201);

    let recorder = container
        .get_as::<RecordingAction>("RecordingAction")
        .unwrap();
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].controller, "UserController");
    assert_eq!(calls[0].method, "post");
    assert!(calls[0].had_body);
}

#[test]
fn hooks_see_no_body_on_get() {
    let (dispatcher, container) = dispatcher_fixture(&["RecordingAction"]);

    let response = dispatcher
        .dispatch(&container, &HttpRequest::new("GET", "/users/7"))
        .unwrap();
    assert_eq!(response.status, 200);

    let recorder = container
        .get_as::<RecordingAction>("RecordingAction")
        .unwrap();
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "get");
    assert!(!calls[0].had_body);
}

#[test]
fn a_rejecting_pre_hook_stops_the_handler() {
    let denier = ServiceDescriptor::service("DenyingAction")
        .autowire(|_| Ok(DenyingAction::new("maintenance window")))
        .before_action_as::<DenyingAction>();
    let app = app_with_hooks(vec![denier], &["DenyingAction"]);

    let response = app.handle_http(&HttpRequest::new("GET", "/users/7"));
    assert_eq!(response.status, 400);
    assert_eq!(response.body, "Error 400: maintenance window");
}

#[test]
fn the_first_failing_hook_wins() {
    let recorder = ServiceDescriptor::service("RecordingAction")
        .autowire(|_| Ok(RecordingAction::new()))
        .before_action_as::<RecordingAction>();
    let denier = ServiceDescriptor::service("DenyingAction")
        .autowire(|_| Ok(DenyingAction::new("nope")))
        .before_action_as::<DenyingAction>();
    let app = app_with_hooks(
        vec![denier, recorder],
        &["DenyingAction", "RecordingAction"],
    );

    let response = app.handle_http(&HttpRequest::new("GET", "/users/7"));
    assert_eq!(response.status, 400);
    assert_eq!(response.body, "Error 400: nope");
}

#[test]
fn misconfigured_hooks_are_an_internal_error() {
    // The configured id exists but is not registered as a pre-hook.
    let plain = ServiceDescriptor::service("NotAHook").autowire(|_| Ok(42_u32));
    let app = app_with_hooks(vec![plain], &["NotAHook"]);

    let response = app.handle_http(&HttpRequest::new("GET", "/users/7"));
    assert_eq!(response.status, 500);
}

#[test]
fn debug_mode_surfaces_internal_detail() {
    let app = common::build_app(
        common::base_config().debug(true),
        ContainerConfig::singleton(),
    );
    let request = HttpRequest::new("POST", "/users/7").with_body("{}");
    let response = app.handle_http(&request);
    assert_eq!(response.status, 500);
    assert!(response.body.contains("name"));
}

#[test]
fn missing_required_body_fields_are_not_the_clients_400() {
    let app = common::app();
    let request = HttpRequest::new("POST", "/users/7").with_body("{}");
    let response = app.handle_http(&request);
    assert_eq!(response.status, 500);
}

#[test]
fn configuration_values_flow_into_handler_output() {
    let app = common::build_app(
        AppConfig::new().parameter("greeting", "yo"),
        ContainerConfig::singleton(),
    );
    assert_eq!(
        app.handle_http(&HttpRequest::new("GET", "/users/1")).body,
        "yo user 1"
    );
}
