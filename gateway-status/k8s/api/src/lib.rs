#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod gateway;

pub use k8s_openapi::{
    api,
    apimachinery::pkg::apis::meta::v1::{Condition, Time},
};
pub use kube::{core::ObjectMeta, Resource, ResourceExt};
