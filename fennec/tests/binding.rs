//! Typed body binding through the HTTP entry point.

mod common;

use fennec::{DataDescriptor, FieldShape, HandlerParam, HandlerSpec, HttpRequest, Response, ServiceDescriptor};

#[test]
fn required_and_setter_fields_bind_from_json() {
    let app = common::app();
    let request = HttpRequest::new("POST", "/users/7").with_body(
        r#"{
            "name": "Ada",
            "email": "ada@example.test",
            "address": { "street": "Main 1", "city": "Turin" }
        }"#,
    );
    let response = app.handle_http(&request);
    assert_eq!(response.status, 201);
    let value: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(value["name"], "Ada");
    assert_eq!(value["email"], "ada@example.test");
    assert_eq!(value["city"], "Turin");
}

#[test]
fn body_keys_are_matched_case_insensitively() {
    let app = common::app();
    let request = HttpRequest::new("POST", "/users/7").with_body(r#"{"NAME":"Ada","Email":"a@b"}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 201);
    let value: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(value["name"], "Ada");
    assert_eq!(value["email"], "a@b");
}

#[test]
fn unbound_body_keys_are_the_clients_fault() {
    let app = common::app();
    let request =
        HttpRequest::new("POST", "/users/7").with_body(r#"{"name":"Ada","shoeSize":42}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 400);
    assert_eq!(response.body, "Error 400: unknown body argument 'shoeSize'");
}

#[test]
fn type_mismatches_carry_expected_and_given() {
    let app = common::app();
    let request = HttpRequest::new("POST", "/users/7").with_body(r#"{"name":42}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 400);
    assert_eq!(
        response.body,
        "Error 400: parameter 'name' expected to be 'string', 'number' given"
    );
}

#[test]
fn nested_mismatches_are_reported_too() {
    let app = common::app();
    let request = HttpRequest::new("POST", "/users/7")
        .with_body(r#"{"name":"Ada","address":{"street":1,"city":"Turin"}}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 400);
    assert_eq!(
        response.body,
        "Error 400: parameter 'street' expected to be 'string', 'number' given"
    );
}

#[test]
fn missing_required_fields_are_not_a_client_error() {
    let app = common::app();
    let request = HttpRequest::new("POST", "/users/7").with_body(r#"{"email":"a@b"}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 500);
}

#[test]
fn ordered_collections_bind_element_wise() {
    #[derive(Debug)]
    struct Item {
        sku: String,
    }

    #[derive(Debug)]
    struct Order {
        items: Vec<Item>,
    }

    struct OrderController;

    let app = fennec::App::builder()
        .service(
            ServiceDescriptor::controller("OrderController", "/orders")
                .autowire(|_| Ok(OrderController))
                .handler(HandlerSpec::new::<OrderController, _>(
                    "POST",
                    vec![HandlerParam::data("order", "Order")],
                    |_, args| {
                        let order = args.take_data::<Order>("order")?;
                        let skus: Vec<_> =
                            order.items.iter().map(|item| item.sku.clone()).collect();
                        Ok(Response::json_value(200, serde_json::json!(skus)).into())
                    },
                )),
        )
        .data_type(
            DataDescriptor::new("Item")
                .required("sku", FieldShape::Scalar)
                .construct(|fields| {
                    Ok(Item {
                        sku: fields.take_string("sku")?,
                    })
                }),
        )
        .data_type(
            DataDescriptor::new("Order")
                .required("items", FieldShape::NestedList("Item".into()))
                .construct(|fields| {
                    Ok(Order {
                        items: fields.take_object_list("items")?,
                    })
                }),
        )
        .build()
        .unwrap();

    let request = HttpRequest::new("POST", "/orders")
        .with_body(r#"{"items":[{"sku":"a-1"},{"sku":"b-2"},{"sku":"c-3"}]}"#);
    let response = app.handle_http(&request);
    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"["a-1","b-2","c-3"]"#);
}

#[test]
fn form_submissions_bind_like_string_bodies() {
    let app = common::app();
    let request = HttpRequest::new("POST", "/users/7")
        .form_field("name", "Ada")
        .form_field("email", "ada%40example.test");
    let response = app.handle_http(&request);
    assert_eq!(response.status, 201);
    let value: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(value["name"], "Ada");
    assert_eq!(value["email"], "ada@example.test");
}
