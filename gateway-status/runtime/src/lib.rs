pub use gateway_status_k8s_api as k8s;
pub use gateway_status_k8s_status as status;

mod args;
mod flush;
mod gateway_class;
mod routes;
mod validation;

pub use self::{
    args::Args,
    flush::{ApiStore, Controller, FlushError, StatusStore},
    gateway_class::{GatewayClassIndex, GatewayClassQueue, GatewayClassUpdate},
    routes::RouteIndex,
};
