use crate::{
    k8s::gateway::{
        httproute::{
            FILTER_REQUEST_HEADER_MODIFIER, HEADER_MATCH_EXACT, PATH_MATCH_EXACT,
            PATH_MATCH_PREFIX,
        },
        GatewayReference, HttpRoute, RouteForwardTo, RouteGateways,
    },
    status::{ConditionStatus, ConditionType, ConditionsUpdate, Reason, Route},
};

/// Stages the conditions for a route as seen by `gateway`.
///
/// Returns `false` without staging anything when the route does not select
/// the gateway at all.
pub(crate) fn check_route(
    update: &mut ConditionsUpdate,
    route: &Route,
    gateway: &GatewayReference,
) -> bool {
    let (gateways, backends) = match route {
        Route::Http(r) => (
            r.spec.gateways.as_ref(),
            r.spec
                .rules
                .iter()
                .flatten()
                .flat_map(|rule| rule.forward_to.iter().flatten())
                .collect::<Vec<_>>(),
        ),
        Route::Tls(r) => (
            r.spec.gateways.as_ref(),
            r.spec
                .rules
                .iter()
                .flatten()
                .flat_map(|rule| rule.forward_to.iter().flatten())
                .collect(),
        ),
        Route::Tcp(r) => (
            r.spec.gateways.as_ref(),
            r.spec
                .rules
                .iter()
                .flatten()
                .flat_map(|rule| rule.forward_to.iter().flatten())
                .collect(),
        ),
    };

    let id = route.id();
    let default_gateways = RouteGateways::default();
    if !gateways
        .unwrap_or(&default_gateways)
        .allows(&id.namespace, gateway)
    {
        if gateways.is_some() {
            update.add_condition(
                ConditionType::ResolvedRefs,
                ConditionStatus::False,
                Reason::GatewayAllowMismatch,
                "Gateway RouteSelector matches, but GatewayAllow has mismatch.",
            );
            return true;
        }
        return false;
    }

    if let Route::Http(r) = route {
        check_http_rules(update, r);
    }
    check_backends(update, &backends);

    let kind = route.kind();
    match (
        update.get(ConditionType::ResolvedRefs).is_some(),
        update.get(ConditionType::NotImplemented).is_some(),
    ) {
        (false, false) => {
            update.add_condition(
                ConditionType::ResolvedRefs,
                ConditionStatus::True,
                Reason::Valid,
                format!("Valid {kind}"),
            );
        }
        (false, true) => {
            update.add_condition(
                ConditionType::ResolvedRefs,
                ConditionStatus::False,
                Reason::ErrorsExist,
                "Errors found, check other Conditions for details.",
            );
        }
        (true, _) => {}
    }
    true
}

fn check_http_rules(update: &mut ConditionsUpdate, route: &HttpRoute) {
    let matches = route
        .spec
        .rules
        .iter()
        .flatten()
        .flat_map(|rule| rule.matches.iter().flatten());
    for m in matches {
        if let Some(path) = &m.path {
            let type_ = path.match_type();
            if type_ != PATH_MATCH_PREFIX && type_ != PATH_MATCH_EXACT {
                update.add_condition(
                    ConditionType::ResolvedRefs,
                    ConditionStatus::False,
                    Reason::PathMatchType,
                    "HTTPRoute.Spec.Rules.PathMatch: Only Prefix match type and Exact match type are supported.",
                );
            }
        }
        if let Some(headers) = &m.headers {
            if headers.match_type() != HEADER_MATCH_EXACT {
                update.add_condition(
                    ConditionType::ResolvedRefs,
                    ConditionStatus::False,
                    Reason::HeaderMatchType,
                    "HTTPRoute.Spec.Rules.HeaderMatch: Only Exact match type is supported.",
                );
            }
        }
    }

    let filters = route
        .spec
        .rules
        .iter()
        .flatten()
        .flat_map(|rule| rule.filters.iter().flatten());
    for filter in filters {
        if filter.type_ != FILTER_REQUEST_HEADER_MODIFIER {
            update.add_condition(
                ConditionType::ResolvedRefs,
                ConditionStatus::False,
                Reason::HttpRouteFilterType,
                "HTTPRoute.Spec.Rules.Filters: Only RequestHeaderModifier type is supported.",
            );
        }
    }
}

fn check_backends(update: &mut ConditionsUpdate, backends: &[&RouteForwardTo]) {
    for backend in backends {
        if backend.service_name.is_none() {
            update.add_condition(
                ConditionType::NotImplemented,
                ConditionStatus::True,
                Reason::NotImplemented,
                "Spec.Rules.ForwardTo: Only Service backends are supported.",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        k8s::{
            gateway::{
                httproute::{HttpHeaderMatch, HttpPathMatch, HttpRouteFilter, HttpRouteMatch, HttpRouteRule},
                GatewayAllowType, HttpRouteSpec, TcpRoute, TcpRouteSpec,
            },
            ObjectMeta,
        },
        status::{Cache, CacheMetrics, ResourceId},
    };
    use pretty_assertions::assert_eq;

    fn gateway() -> GatewayReference {
        GatewayReference {
            namespace: "projectcontour".to_string(),
            name: "contour".to_string(),
        }
    }

    fn cache() -> Cache {
        Cache::new(
            ResourceId::new("projectcontour".to_string(), "contour".to_string()),
            CacheMetrics::default(),
        )
    }

    fn meta(ns: &str) -> ObjectMeta {
        ObjectMeta {
            namespace: Some(ns.to_string()),
            name: Some("route".to_string()),
            generation: Some(1),
            ..Default::default()
        }
    }

    fn all_gateways() -> Option<RouteGateways> {
        Some(RouteGateways {
            allow: Some(GatewayAllowType::All),
            gateway_refs: None,
        })
    }

    fn http_route(rules: Vec<HttpRouteRule>) -> Route {
        Route::Http(HttpRoute {
            metadata: meta("default"),
            spec: HttpRouteSpec {
                gateways: all_gateways(),
                hostnames: None,
                rules: Some(rules),
            },
            status: None,
        })
    }

    fn service(name: &str) -> RouteForwardTo {
        RouteForwardTo {
            service_name: Some(name.to_string()),
            port: Some(80),
            weight: None,
        }
    }

    fn run(route: &Route) -> (bool, ConditionsUpdate) {
        let cache = cache();
        let mut update = cache.conditions_accessor(route.id(), 1, route.kind(), &[]);
        let selected = check_route(&mut update, route, &gateway());
        (selected, update.into_inner())
    }

    #[test]
    fn valid_http_route() {
        let route = http_route(vec![HttpRouteRule {
            matches: Some(vec![HttpRouteMatch {
                path: Some(HttpPathMatch {
                    type_: Some("Exact".to_string()),
                    value: Some("/".to_string()),
                }),
                headers: None,
            }]),
            filters: Some(vec![HttpRouteFilter {
                type_: "RequestHeaderModifier".to_string(),
            }]),
            forward_to: Some(vec![service("web")]),
        }]);

        let (selected, update) = run(&route);
        assert!(selected);
        assert_eq!(update.len(), 1);
        let cond = update.get(ConditionType::ResolvedRefs).unwrap();
        assert_eq!(cond.status, "True");
        assert_eq!(cond.reason, "Valid");
        assert_eq!(cond.message, "Valid HTTPRoute");
    }

    #[test]
    fn unsupported_matches_accumulate() {
        let route = http_route(vec![HttpRouteRule {
            matches: Some(vec![HttpRouteMatch {
                path: Some(HttpPathMatch {
                    type_: Some("RegularExpression".to_string()),
                    value: Some("/.*".to_string()),
                }),
                headers: Some(HttpHeaderMatch {
                    type_: Some("RegularExpression".to_string()),
                    values: Default::default(),
                }),
            }]),
            filters: None,
            forward_to: Some(vec![service("web")]),
        }]);

        let (_, update) = run(&route);
        let cond = update.get(ConditionType::ResolvedRefs).unwrap();
        assert_eq!(cond.status, "False");
        assert_eq!(cond.reason, "HeaderMatchType");
        assert_eq!(
            cond.message,
            "HTTPRoute.Spec.Rules.PathMatch: Only Prefix match type and Exact match type are supported., \
             HTTPRoute.Spec.Rules.HeaderMatch: Only Exact match type is supported."
        );
    }

    #[test]
    fn unsupported_filter() {
        let route = http_route(vec![HttpRouteRule {
            matches: None,
            filters: Some(vec![HttpRouteFilter {
                type_: "RequestMirror".to_string(),
            }]),
            forward_to: Some(vec![service("web")]),
        }]);

        let (_, update) = run(&route);
        let cond = update.get(ConditionType::ResolvedRefs).unwrap();
        assert_eq!(cond.reason, "HTTPRouteFilterType");
    }

    #[test]
    fn non_service_backend_is_not_implemented() {
        let route = Route::Tcp(TcpRoute {
            metadata: meta("default"),
            spec: TcpRouteSpec {
                gateways: all_gateways(),
                rules: Some(vec![crate::k8s::gateway::tcproute::TcpRouteRule {
                    forward_to: Some(vec![RouteForwardTo::default()]),
                }]),
            },
            status: None,
        });

        let (_, update) = run(&route);
        assert_eq!(
            update.get(ConditionType::NotImplemented).unwrap().reason,
            "NotImplemented"
        );
        let resolved = update.get(ConditionType::ResolvedRefs).unwrap();
        assert_eq!(resolved.status, "False");
        assert_eq!(resolved.reason, "ErrorsExist");
    }

    #[test]
    fn explicit_allow_mismatch_is_reported() {
        let route = Route::Tcp(TcpRoute {
            metadata: meta("default"),
            spec: TcpRouteSpec {
                gateways: Some(RouteGateways {
                    allow: Some(GatewayAllowType::FromList),
                    gateway_refs: Some(vec![GatewayReference {
                        namespace: "projectcontour".to_string(),
                        name: "other".to_string(),
                    }]),
                }),
                rules: None,
            },
            status: None,
        });

        let (selected, update) = run(&route);
        assert!(selected);
        let cond = update.get(ConditionType::ResolvedRefs).unwrap();
        assert_eq!(cond.reason, "GatewayAllowMismatch");
        assert_eq!(update.len(), 1);
    }

    #[test]
    fn unselected_route_stages_nothing() {
        // No `gateways` stanza: only Gateways in the route's own namespace
        // may select it.
        let route = Route::Tcp(TcpRoute {
            metadata: meta("default"),
            spec: TcpRouteSpec::default(),
            status: None,
        });

        let (selected, update) = run(&route);
        assert!(!selected);
        assert!(update.is_empty());
    }
}
