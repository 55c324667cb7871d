//! Typed client core for the Rakuten RMS order management API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `RmsApi` pairs the client
//! with a `Transport` for callers that want a one-call facade; the blocking
//! `UreqTransport` is available behind the default `ureq` feature.
//!
//! # Design
//! - `RmsClient` starts uninitialized and refuses to build requests until
//!   `initialize` has turned the service secret and license key into an
//!   `ESA` credential.
//! - Caller conditions pass through a permissive normalizer: invalid optional
//!   values are dropped from the payload and recorded in a
//!   `NormalizationReport`, never raised as errors.
//! - Order endpoints speak JSON; the shop calendar speaks XML. Both decode
//!   through the `Envelope` trait, which rejects empty message lists.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod calendar;
pub mod client;
pub mod condition;
pub mod config;
pub mod datetime;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::RmsApi;
pub use calendar::{decode_shop_calendar, CalendarEvent, ShopBizApiResponse, ShopCalendar, ShopHoliday};
pub use client::RmsClient;
pub use condition::{
    BasketCondition, FieldOutcome, NormalizationReport, Normalized, OmitReason, SearchDateType,
    SearchOrderCondition, ShippingModelCondition, ShopCalendarCondition, UpdateOrderMemoCondition,
};
pub use config::ClientConfig;
pub use datetime::{JsonDate, JsonTime};
pub use envelope::{Envelope, ResultMessage, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{GetOrderResponse, MessageModel, OrderModel, SearchOrderResponse, UpdateOrderResponse};
