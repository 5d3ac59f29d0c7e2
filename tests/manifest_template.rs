//! Contract tests for the shipped `assets/etcd.yaml.j2` template.

mod common;

use pxetcd::{AppError, ServiceConfig};
use serde::Deserialize;
use serde_yaml::Value;

fn config() -> ServiceConfig {
    ServiceConfig {
        root: Some(common::repo_assets().parent().unwrap().to_path_buf()),
        image_tag: "1.2.11.10".to_string(),
        ..ServiceConfig::default()
    }
}

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn documents(manifest: &str) -> Vec<Value> {
    serde_yaml::Deserializer::from_str(manifest)
        .map(|doc| Value::deserialize(doc).expect("rendered manifest must be valid YAML"))
        .collect()
}

fn find<'a>(docs: &'a [Value], kind: &str) -> &'a Value {
    docs.iter().find(|doc| doc["kind"] == kind).unwrap_or_else(|| panic!("no {kind} document"))
}

fn etcd_command(docs: &[Value]) -> Vec<String> {
    find(docs, "StatefulSet")["spec"]["template"]["spec"]["containers"][0]["command"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|arg| arg.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn full_parameter_set_renders_valid_yaml() {
    let manifest = pxetcd::render(
        &config(),
        &pairs(&[
            ("i1", "10.0.0.1"),
            ("i2", "10.0.0.2"),
            ("i3", "10.0.0.3"),
            ("e", "true"),
            ("t", "px-token"),
            ("r", "/pwx"),
            ("c", "12379"),
            ("p", "12380"),
            ("d", "/data/etcd"),
            ("u", "admin"),
            ("v", "v1.7.5"),
            ("s", "/dev/sdb,/dev/sdc"),
            ("env", "PX_HTTP_PROXY=http://proxy:3128,DEBUG=1"),
            ("type", "docker"),
            ("m", "true"),
        ]),
        "http://gen:8080/?i1=10.0.0.1",
    )
    .unwrap();

    let docs = documents(&manifest);
    assert_eq!(docs.len(), 7);

    assert_eq!(find(&docs, "ClusterRole")["apiVersion"], "rbac.authorization.k8s.io/v1beta1");
    assert_eq!(find(&docs, "ConfigMap")["data"]["endpoints"], r#"["10.0.0.1", "10.0.0.2", "10.0.0.3"]"#);

    let statefulset = find(&docs, "StatefulSet");
    assert_eq!(statefulset["spec"]["replicas"], 3);
    assert_eq!(
        statefulset["spec"]["template"]["spec"]["nodeSelector"]["node-role.kubernetes.io/master"],
        ""
    );

    let command = etcd_command(&docs);
    assert!(command.contains(&"--data-dir=/data/etcd".to_string()));
    assert!(command.contains(&"--listen-client-urls=https://0.0.0.0:12379".to_string()));
    assert!(command.contains(&"--initial-cluster-token=px-token".to_string()));
    assert!(command.contains(&"--peer-client-cert-auth".to_string()));
    assert!(command.contains(
        &"--initial-cluster=etcd0=https://10.0.0.1:12380,etcd1=https://10.0.0.2:12380,etcd2=https://10.0.0.3:12380"
            .to_string()
    ));

    let portworx = &find(&docs, "DaemonSet")["spec"]["template"]["spec"]["containers"][0];
    assert_eq!(portworx["image"], "portworx/px-enterprise:1.2.11.10");
    let args: Vec<&str> =
        portworx["args"].as_sequence().unwrap().iter().map(|a| a.as_str().unwrap()).collect();
    assert_eq!(
        args,
        ["-k", "etcd:https://px-etcd.kube-system:12379", "-s", "/dev/sdb", "-s", "/dev/sdc"]
    );
    assert_eq!(portworx["env"][0]["name"], "PX_HTTP_PROXY");
    assert_eq!(portworx["env"][0]["value"], "http://proxy:3128");
    assert_eq!(portworx["env"][1]["name"], "DEBUG");
    assert_eq!(portworx["env"][1]["value"], "1");
}

#[test]
fn minimal_request_uses_defaults() {
    let manifest = pxetcd::render(&config(), &[], "unknown").unwrap();
    let docs = documents(&manifest);

    assert!(manifest.starts_with("# SOURCE: unknown\n# Template: v2\n"));
    assert_eq!(find(&docs, "ConfigMap")["data"]["endpoints"], r#"["auto"]"#);
    assert_eq!(find(&docs, "StatefulSet")["spec"]["replicas"], 3);
    assert!(find(&docs, "StatefulSet")["spec"]["template"]["spec"].get("nodeSelector").is_none());

    let command = etcd_command(&docs);
    assert!(command.contains(&"--data-dir=/var/lib/etcd".to_string()));
    assert!(command.contains(&"--discovery-srv=px-etcd.kube-system.svc".to_string()));

    let portworx = &find(&docs, "DaemonSet")["spec"]["template"]["spec"]["containers"][0];
    assert_eq!(portworx["image"], "portworx/oci-monitor:1.2.11.10");
    assert!(portworx.get("env").is_none());
    let args: Vec<&str> =
        portworx["args"].as_sequence().unwrap().iter().map(|a| a.as_str().unwrap()).collect();
    assert_eq!(args, ["-k", "etcd:http://px-etcd.kube-system:2379", "-a", "-f", "--oci"]);
}

#[test]
fn gke_build_enables_controller_rules() {
    let manifest =
        pxetcd::render(&config(), &pairs(&[("v", "1.6.11-gke.0")]), "unknown").unwrap();
    let docs = documents(&manifest);

    let role = find(&docs, "ClusterRole");
    assert_eq!(role["apiVersion"], "rbac.authorization.k8s.io/v1beta1");
    assert_eq!(role["rules"].as_sequence().unwrap().len(), 2);
    assert!(manifest.contains("# Template: v2, Kubernetes 1.6.11\n"));
}

#[test]
fn pre_rbac_beta_release_uses_alpha_api() {
    let manifest = pxetcd::render(&config(), &pairs(&[("v", "1.6.0")]), "unknown").unwrap();
    let docs = documents(&manifest);
    assert_eq!(find(&docs, "ClusterRoleBinding")["apiVersion"], "rbac.authorization.k8s.io/v1alpha1");
    assert_eq!(find(&docs, "ClusterRole")["rules"].as_sequence().unwrap().len(), 1);
}

#[test]
fn percent_in_origin_is_kept_verbatim() {
    let origin = "http://gen:8080/?t=50%25&r=%2Fpx%d";
    let manifest = pxetcd::render(&config(), &[], origin).unwrap();
    assert_eq!(manifest.lines().next().unwrap(), format!("# SOURCE: {}", origin));
    assert_eq!(manifest.matches('%').count(), origin.matches('%').count());
}

#[test]
fn rendering_is_byte_identical_across_calls() {
    let request = pairs(&[("i1", "a"), ("i2", "b"), ("v", "1.9.0"), ("env", "A=1")]);
    let first = pxetcd::render(&config(), &request, "x").unwrap();
    let second = pxetcd::render(&config(), &request, "x").unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_key_does_not_change_output_in_lenient_mode() {
    let base = pairs(&[("i1", "a"), ("v", "1.8.0")]);
    let mut with_unknown = base.clone();
    with_unknown.push(("zone".to_string(), "us-east".to_string()));

    let expected = pxetcd::render(&config(), &base, "x").unwrap();
    assert_eq!(pxetcd::render(&config(), &with_unknown, "x").unwrap(), expected);

    let strict = ServiceConfig { strict: true, ..config() };
    assert!(matches!(
        pxetcd::render(&strict, &with_unknown, "x"),
        Err(AppError::UnrecognizedField(key)) if key == "zone"
    ));
}

#[test]
fn missing_template_is_a_load_error() {
    let config = ServiceConfig { template: "assets/missing.j2".to_string(), ..config() };
    assert!(matches!(
        pxetcd::render(&config, &[], "x"),
        Err(AppError::TemplateLoad { path, .. }) if path.ends_with("missing.j2")
    ));
}
