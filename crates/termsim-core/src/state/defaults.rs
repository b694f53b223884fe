//! Baseline environment for fresh and reset sessions.

use serde_json::{Map, Value, json};

use super::EnvironmentState;

/// Baseline cluster: two namespaces and one nginx pod, deployment and service.
fn default_k8s_state() -> Value {
    json!({
        "current_namespace": "default",
        "namespaces": ["default", "kube-system"],
        "pods": {
            "default": {
                "nginx-pod": {
                    "status": "Running",
                    "ip": "10.0.0.2",
                    "containers": ["nginx"],
                    "labels": {"app": "nginx"}
                }
            }
        },
        "deployments": {
            "default": {
                "nginx-deployment": {
                    "replicas": 3,
                    "available": 3,
                    "containers": ["nginx:1.19"],
                    "labels": {"app": "nginx"}
                }
            }
        },
        "services": {
            "default": {
                "nginx-service": {
                    "type": "ClusterIP",
                    "ports": [{"port": 80, "targetPort": 80}],
                    "selector": {"app": "nginx"},
                    "clusterIP": "10.96.0.1"
                }
            }
        }
    })
}

/// Baseline working tree: no repository yet, some dirty and untracked files.
fn default_git_state() -> Value {
    json!({
        "initialized": false,
        "current_branch": null,
        "branches": [],
        "commits": [],
        "staged_files": [],
        "modified_files": ["README.md", "app.py"],
        "untracked_files": ["data.json", "config.yml"]
    })
}

/// Builds the default environment (cluster facts followed by VCS facts).
///
/// This is a pure value; every call returns an identical tree.
pub fn default_environment() -> EnvironmentState {
    let mut root = Map::new();
    for section in [default_k8s_state(), default_git_state()] {
        if let Value::Object(fields) = section {
            root.extend(fields);
        }
    }
    EnvironmentState::from_map(root)
}
