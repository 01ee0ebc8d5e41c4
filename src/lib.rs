//! `license-resolvr`: turn raw per-package license and copyright evidence
//! into a canonical, queryable license picture.
//!
//! # Layout
//! - [`expression`]: SPDX license expressions (parse, validate, normalize, decompose).
//! - [`license`]: id registries, alias and deprecated-id tables, declared-license mapping.
//! - [`graph`]: dependency trees, the compact graph and the [`graph::DependencyNavigator`] over both.
//! - [`copyright`]: grouping of copyright statements by holder.
//! - [`matcher`]: attribution of copyright findings to license findings.
//! - [`resolver`]: the memoized per-package [`resolver::LicenseInfoResolver`].
//! - [`evidence`]: a JSON-file backed [`resolver::LicenseInfoProvider`].
//! - [`config`], [`report`]: configuration loading and output rendering.

pub mod config;
pub mod copyright;
pub mod evidence;
pub mod expression;
pub mod graph;
pub mod license;
pub mod matcher;
pub mod models;
pub mod report;
pub mod resolver;
