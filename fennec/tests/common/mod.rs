//! Shared fixture: a small user-management application.

use fennec::{
    App, AppConfig, ContainerConfig, CtorParam, DataDescriptor, FieldShape, HandlerParam,
    HandlerSpec, Response, ServiceDescriptor,
};
use std::sync::Arc;

/// A user repository the controller talks to through its interface name.
pub struct MemoryUserRepository {
    pub greeting: String,
}

impl MemoryUserRepository {
    pub fn describe(&self, id: &str) -> String {
        format!("{} user {id}", self.greeting)
    }
}

#[derive(Debug)]
pub struct Address {
    pub street: String,
    pub city: String,
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<Address>,
}

pub struct UserController {
    pub repo: Arc<MemoryUserRepository>,
}

pub fn service_descriptors() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor::service("MemoryUserRepository")
            .implements("UserRepository")
            .param(CtorParam::config("greeting"))
            .autowire(|deps| {
                Ok(MemoryUserRepository {
                    greeting: deps.config_text()?,
                })
            }),
        ServiceDescriptor::controller("UserController", "/users/{id}")
            .param(CtorParam::service("repo", "UserRepository"))
            .autowire(|deps| {
                Ok(UserController {
                    repo: deps.service::<MemoryUserRepository>()?,
                })
            })
            .handler(HandlerSpec::new::<UserController, _>(
                "GET",
                vec![HandlerParam::text("id")],
                |controller, args| {
                    let id = args.take_text("id")?;
                    Ok(controller.repo.describe(&id).into())
                },
            ))
            .handler(HandlerSpec::new::<UserController, _>(
                "POST",
                vec![
                    HandlerParam::text("id"),
                    HandlerParam::data("user", "NewUser"),
                ],
                |_, args| {
                    let id = args.take_text("id")?;
                    let user = args.take_data::<NewUser>("user")?;
                    Ok(Response::json_value(
                        201,
                        serde_json::json!({
                            "id": id,
                            "name": user.name,
                            "email": user.email,
                            "city": user.address.map(|a| a.city),
                        }),
                    )
                    .into())
                },
            ))
            .handler(HandlerSpec::new::<UserController, _>(
                "PUT",
                vec![
                    HandlerParam::text("id"),
                    HandlerParam::untyped("payload"),
                ],
                |_, args| {
                    let _ = args.take_text("id")?;
                    let payload = args.take_untyped("payload")?;
                    Ok(Response::json_value(200, payload).into())
                },
            )),
    ]
}

pub fn data_descriptors() -> Vec<DataDescriptor> {
    vec![
        DataDescriptor::new("Address")
            .required("street", FieldShape::Scalar)
            .required("city", FieldShape::Scalar)
            .construct(|fields| {
                Ok(Address {
                    street: fields.take_string("street")?,
                    city: fields.take_string("city")?,
                })
            }),
        DataDescriptor::new("NewUser")
            .required("name", FieldShape::Scalar)
            .construct(|fields| {
                Ok(NewUser {
                    name: fields.take_string("name")?,
                    email: None,
                    address: None,
                })
            })
            .setter::<NewUser, _>("email", FieldShape::Scalar, |user, value| {
                user.email = value.into_opt_string("email")?;
                Ok(())
            })
            .setter::<NewUser, _>(
                "address",
                FieldShape::Nested("Address".into()),
                |user, value| {
                    user.address = value.into_opt_object("address")?;
                    Ok(())
                },
            ),
    ]
}

pub fn base_config() -> AppConfig {
    AppConfig::new().parameter("greeting", "hello")
}

pub fn build_app(config: AppConfig, policy: ContainerConfig) -> App {
    let mut builder = App::builder().config(config).container_config(policy);
    for descriptor in service_descriptors() {
        builder = builder.service(descriptor);
    }
    for descriptor in data_descriptors() {
        builder = builder.data_type(descriptor);
    }
    builder.build().expect("fixture app boots")
}

pub fn app() -> App {
    build_app(base_config(), ContainerConfig::singleton())
}
