//! Admin desk for a products/orders backend.
//!
//! The heart of the crate is [`reconciler::LineItem`], which keeps an order line's
//! selected product, quantity and total consistent with the product catalog.
//! Each open order form runs as a [`form::FormSession`] actor around one line item;
//! everything else talks to the backend through [`api::Backend`].

pub mod actor_framework;
pub mod api;
pub mod app_system;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod format;
pub mod messages;
pub mod notice;
pub mod order_actor;
pub mod product_actor;
pub mod reconciler;
pub mod views;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
