//! Request Signing
//!
//! Backends with proprietary signing schemes get their authenticated
//! headers from here. Every function is pure over its inputs, including the
//! timestamp, so signatures are reproducible.

pub mod tc3;

pub use tc3::{
    CanonicalRequest, SignedHeaders, SigningContext, StringToSign, Tc3Credentials, Tc3Signature,
    sign,
};
