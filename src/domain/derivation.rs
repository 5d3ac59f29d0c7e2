//! Computed fields substituted into the manifest template.
//!
//! [`derive`] runs the derivation steps in a fixed order: list formatting,
//! runtime selection, version normalization, RBAC API selection, image
//! selection. Every step only reads the record and earlier results.

use serde::Serialize;

use crate::domain::AppError;
use crate::domain::params::Params;
use crate::domain::version::{KubeVersion, Version};

/// Revision of the variable set exposed to templates.
pub const TEMPLATE_VERSION: &str = "v2";
/// Image used for the docker runtime, combined with the image tag.
pub const PX_IMAGE_PREFIX: &str = "portworx/px-enterprise";
/// Image used for the OCI runtime, combined with the image tag.
pub const OCI_IMAGE_PREFIX: &str = "portworx/oci-monitor";
/// Rendered in place of the endpoint list when no peers were submitted.
pub const AUTO_DISCOVER_ENDPOINTS: &str = r#""auto""#;

const DRIVES_AUTO: &str = r#""-a", "-f""#;
const DRIVES_AUTO_FORCED: &str = r#""-A", "-f""#;
const ENV_ENTRY_INDENT: &str = "            ";
const ENV_VALUE_INDENT: &str = "              ";

/// `rbac.authorization.k8s.io` API version matching the cluster release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RbacApiVersion {
    #[serde(rename = "v1alpha1")]
    V1Alpha1,
    #[serde(rename = "v1beta1")]
    V1Beta1,
    #[serde(rename = "v1")]
    V1,
}

impl RbacApiVersion {
    /// RBAC is alpha in 1.6, beta in 1.7 and stable from 1.8.
    ///
    /// Unspecified versions select the 1.7 default.
    pub fn for_version(version: &KubeVersion) -> Self {
        let Some(version) = version.version() else {
            return RbacApiVersion::V1Beta1;
        };
        if *version < Version::new(1, 7, 0) {
            RbacApiVersion::V1Alpha1
        } else if *version < Version::new(1, 8, 0) {
            RbacApiVersion::V1Beta1
        } else {
            RbacApiVersion::V1
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RbacApiVersion::V1Alpha1 => "v1alpha1",
            RbacApiVersion::V1Beta1 => "v1beta1",
            RbacApiVersion::V1 => "v1",
        }
    }
}

/// RBAC version plus whether the PVC controller must be deployed.
///
/// GKE rejects the alpha API and needs the controller regardless of release.
pub fn select_authorization(version: &KubeVersion, openshift: bool) -> (RbacApiVersion, bool) {
    let mut rbac = RbacApiVersion::for_version(version);
    let mut need_controller = openshift;
    if version.is_managed_platform() {
        need_controller = true;
        if rbac == RbacApiVersion::V1Alpha1 {
            rbac = RbacApiVersion::V1Beta1;
        }
    }
    (rbac, need_controller)
}

/// Everything a manifest template can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestContext {
    pub template_version: &'static str,
    pub origin: String,
    pub endpoints: Vec<String>,
    /// `"a", "b"` or [`AUTO_DISCOVER_ENDPOINTS`].
    pub endpoint_list: String,
    /// `etcd0=http://a:2380,etcd1=http://b:2380`.
    pub initial_cluster: String,
    /// `http://a:2379,http://b:2379`.
    pub client_urls: String,
    pub encryption: bool,
    pub scheme: &'static str,
    pub initial_token: String,
    pub prefix: String,
    pub client_port: u16,
    pub peer_port: u16,
    pub data_dir: String,
    pub username: String,
    pub drives: String,
    pub env: String,
    pub is_runc: bool,
    pub masterless: bool,
    pub kube_version: String,
    pub is_gke: bool,
    pub rbac_auth_version: RbacApiVersion,
    pub need_controller: bool,
    pub px_image: String,
}

/// Compute the template variables for `params`.
pub fn derive(params: &Params, image_tag: &str) -> Result<ManifestContext, AppError> {
    let encryption = params.encryption.is_on();
    let scheme = if encryption { "https" } else { "http" };

    let endpoint_list = format_endpoint_list(&params.endpoints);
    let initial_cluster = format_peer_urls(&params.endpoints, scheme, params.peer_port());
    let client_urls = format_client_urls(&params.endpoints, scheme, params.client_port());
    let drives = format_drives(&params.drives, params.force);
    let env = format_env(&params.env);

    let is_runc = !params.runtime_type.starts_with("dock");

    let kube_version = KubeVersion::normalize(&params.kube_version)?;

    let (rbac_auth_version, need_controller) =
        select_authorization(&kube_version, params.openshift);

    let px_image = if params.image.is_empty() {
        select_image(is_runc, image_tag)
    } else {
        params.image.clone()
    };

    Ok(ManifestContext {
        template_version: TEMPLATE_VERSION,
        origin: params.origin.as_str().to_string(),
        endpoints: params.endpoints.clone(),
        endpoint_list,
        initial_cluster,
        client_urls,
        encryption,
        scheme,
        initial_token: params.initial_token.clone(),
        prefix: params.prefix.clone(),
        client_port: params.client_port(),
        peer_port: params.peer_port(),
        data_dir: params.directory.clone(),
        username: params.username.clone(),
        drives,
        env,
        is_runc,
        masterless: !params.master,
        kube_version: kube_version.as_str().to_string(),
        is_gke: kube_version.is_managed_platform(),
        rbac_auth_version,
        need_controller,
        px_image,
    })
}

fn format_endpoint_list(endpoints: &[String]) -> String {
    if endpoints.is_empty() {
        return AUTO_DISCOVER_ENDPOINTS.to_string();
    }
    endpoints.iter().map(|ep| format!("\"{}\"", ep)).collect::<Vec<_>>().join(", ")
}

fn format_peer_urls(endpoints: &[String], scheme: &str, port: u16) -> String {
    endpoints
        .iter()
        .enumerate()
        .map(|(idx, ep)| format!("etcd{}={}://{}:{}", idx, scheme, ep, port))
        .collect::<Vec<_>>()
        .join(",")
}

fn format_client_urls(endpoints: &[String], scheme: &str, port: u16) -> String {
    endpoints
        .iter()
        .map(|ep| format!("{}://{}:{}", scheme, ep, port))
        .collect::<Vec<_>>()
        .join(",")
}

/// Device list as container args; without devices every unused drive is claimed.
fn format_drives(drives: &str, force: bool) -> String {
    let args: Vec<String> = drives
        .split(',')
        .map(str::trim)
        .filter(|dev| !dev.is_empty())
        .map(|dev| format!("\"-s\", \"{}\"", dev))
        .collect();

    if !args.is_empty() {
        args.join(", ")
    } else if force {
        DRIVES_AUTO_FORCED.to_string()
    } else {
        DRIVES_AUTO.to_string()
    }
}

/// `NAME=value` pairs as YAML `env` items, continuation lines pre-indented.
///
/// Entries without `=` are dropped.
fn format_env(env: &str) -> String {
    let mut out = String::new();
    let mut indent = "";
    for entry in env.split(',').map(str::trim) {
        let Some((name, value)) = entry.split_once('=') else {
            continue;
        };
        out.push_str(indent);
        indent = ENV_ENTRY_INDENT;
        out.push_str(&format!("- name: \"{}\"\n", name));
        out.push_str(&format!("{}value: \"{}\"\n", ENV_VALUE_INDENT, value));
    }
    out
}

fn select_image(is_runc: bool, tag: &str) -> String {
    let prefix = if is_runc { OCI_IMAGE_PREFIX } else { PX_IMAGE_PREFIX };
    format!("{}:{}", prefix, tag)
}
