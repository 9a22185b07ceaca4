use gateway_status_k8s_api::gateway::{GatewayReference, RouteStatusGatewayReference};
use std::fmt;

#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct ResourceId {
    pub namespace: String,
    pub name: String,
}

impl ResourceId {
    pub fn new(namespace: String, name: String) -> Self {
        Self { namespace, name }
    }

    /// Checks whether a status block's gateway reference names this resource.
    pub(crate) fn is_gateway_ref(&self, gateway_ref: &RouteStatusGatewayReference) -> bool {
        self.namespace == gateway_ref.namespace && self.name == gateway_ref.name
    }

    pub(crate) fn to_gateway_ref(&self) -> RouteStatusGatewayReference {
        RouteStatusGatewayReference {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }

    pub fn to_gateway_reference(&self) -> GatewayReference {
        GatewayReference {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
