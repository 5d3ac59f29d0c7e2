//! Request decoding: maps submitted `(key, value)` pairs onto [`Params`].
//!
//! Each recognized key has one entry in [`FIELDS`]; the decoder never looks
//! at a key that is not listed there.

use tracing::info;

use crate::domain::AppError;
use crate::domain::params::{Encryption, Params, Port, parse_flag};

type Setter = fn(&mut Params, &str, &str) -> Result<(), AppError>;

struct Field {
    key: &'static str,
    set: Setter,
}

const FIELDS: &[Field] = &[
    Field { key: "i1", set: push_endpoints },
    Field { key: "i2", set: push_endpoints },
    Field { key: "i3", set: push_endpoints },
    Field { key: "e", set: set_encryption },
    Field { key: "t", set: |p, _, v| assign(&mut p.initial_token, v) },
    Field { key: "r", set: |p, _, v| assign(&mut p.prefix, v) },
    Field { key: "c", set: |p, k, v| set_port(&mut p.client_port, k, v) },
    Field { key: "p", set: |p, k, v| set_port(&mut p.peer_port, k, v) },
    Field { key: "d", set: |p, _, v| assign(&mut p.directory, v) },
    Field { key: "u", set: |p, _, v| assign(&mut p.username, v) },
    Field { key: "v", set: |p, _, v| assign(&mut p.kube_version, v) },
    Field { key: "s", set: |p, _, v| assign(&mut p.drives, v) },
    Field { key: "f", set: |p, k, v| set_flag(&mut p.force, k, v) },
    Field { key: "env", set: |p, _, v| assign(&mut p.env, v) },
    Field { key: "type", set: |p, _, v| assign(&mut p.runtime_type, v) },
    Field { key: "m", set: |p, k, v| set_flag(&mut p.master, k, v) },
    Field { key: "osft", set: |p, k, v| set_flag(&mut p.openshift, k, v) },
    Field { key: "img", set: |p, _, v| assign(&mut p.image, v.trim()) },
];

/// Keys accepted by the decoder, in table order.
pub fn recognized_keys() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|field| field.key)
}

fn assign(slot: &mut String, value: &str) -> Result<(), AppError> {
    *slot = value.to_string();
    Ok(())
}

fn push_endpoints(params: &mut Params, _key: &str, value: &str) -> Result<(), AppError> {
    params.endpoints.extend(
        value.split(',').map(str::trim).filter(|entry| !entry.is_empty()).map(str::to_string),
    );
    Ok(())
}

fn set_encryption(params: &mut Params, key: &str, value: &str) -> Result<(), AppError> {
    params.encryption = if parse_flag(key, value)? { Encryption::On } else { Encryption::Off };
    Ok(())
}

fn set_port(slot: &mut Option<Port>, key: &str, value: &str) -> Result<(), AppError> {
    *slot = if value.trim().is_empty() { None } else { Some(Port::parse(key, value)?) };
    Ok(())
}

fn set_flag(slot: &mut bool, key: &str, value: &str) -> Result<(), AppError> {
    *slot = parse_flag(key, value)?;
    Ok(())
}

/// Decoding policy for keys outside the recognized table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    strict: bool,
}

impl Decoder {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Build a [`Params`] record from submitted pairs.
    ///
    /// Repeated endpoint keys accumulate; any other repeated key keeps its last value.
    /// `caller` is only used for the audit log line.
    pub fn decode<'a, I>(&self, pairs: I, caller: &str) -> Result<Params, AppError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Params::default();
        for (key, value) in pairs {
            match FIELDS.iter().find(|field| field.key == key) {
                Some(field) => (field.set)(&mut params, key, value)?,
                None if self.strict => return Err(AppError::UnrecognizedField(key.to_string())),
                None => {}
            }
        }

        info!(caller = %caller, strict = self.strict, params = ?params, "decoded request parameters");
        Ok(params)
    }
}
