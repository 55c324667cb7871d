//! Request builder and response parser for the RMS order and shop APIs.
//!
//! # Design
//! `RmsClient` holds the base URL and, once initialized, the precomputed
//! credential. Each operation is split into a `build_*` method producing an
//! `HttpRequest` and a `parse_*` method consuming an `HttpResponse`, so the
//! I/O boundary stays explicit. `RmsApi` (see `api.rs`) glues the two halves
//! to a `Transport`.
//!
//! An uninitialized client refuses to build anything: every `build_*` returns
//! `ApiError::Uninitialized` before a request exists. `initialize` consumes the
//! client and returns an initialized one; there is no way back.
//!
//! Builders that normalize a condition have a `_with_report` twin returning the
//! `NormalizationReport` next to the request, for callers that need to know
//! which supplied values never reached the wire.

use crate::calendar::ShopBizApiResponse;
use crate::condition::{
    normalize_order_memo, normalize_order_shipping, normalize_search_order, normalize_shop_calendar,
    BasketCondition, GetOrderRequest, NormalizationReport, SearchDateType, SearchOrderCondition, ShopCalendarCondition,
    UpdateOrderMemoCondition, GET_ORDER_MAX_NUMBERS,
};
use crate::datetime::JsonTime;
use crate::envelope::{
    decode_response, encode_json_request, encode_query_request, Authorization, Envelope, GET_ORDER,
    SEARCH_ORDER, SHOP_CALENDAR, UPDATE_ORDER_MEMO, UPDATE_ORDER_SHIPPING,
};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{GetOrderResponse, SearchOrderResponse, UpdateOrderResponse};

#[derive(Debug, Clone)]
pub struct RmsClient {
    base_url: String,
    auth: Option<Authorization>,
}

impl RmsClient {
    /// An uninitialized client for `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: None,
        }
    }

    /// Compute the credential from the service secret and license key.
    pub fn initialize(self, service_secret: &str, license_key: &str) -> Result<Self, ApiError> {
        if service_secret.is_empty() || license_key.is_empty() {
            return Err(ApiError::Config(
                "service secret and license key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            base_url: self.base_url,
            auth: Some(Authorization::from_credentials(service_secret, license_key)),
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.auth.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth(&self) -> Result<&Authorization, ApiError> {
        self.auth.as_ref().ok_or(ApiError::Uninitialized)
    }

    pub fn build_search_order(
        &self,
        date_type: SearchDateType,
        start: impl Into<JsonTime>,
        end: impl Into<JsonTime>,
        cond: Option<&SearchOrderCondition>,
    ) -> Result<HttpRequest, ApiError> {
        self.build_search_order_with_report(date_type, start, end, cond)
            .map(|(request, _)| request)
    }

    pub fn build_search_order_with_report(
        &self,
        date_type: SearchDateType,
        start: impl Into<JsonTime>,
        end: impl Into<JsonTime>,
        cond: Option<&SearchOrderCondition>,
    ) -> Result<(HttpRequest, NormalizationReport), ApiError> {
        let auth = self.auth()?;
        let normalized = normalize_search_order(date_type, start.into(), end.into(), cond);
        let request = encode_json_request(&self.base_url, &SEARCH_ORDER, auth, &normalized.payload)?;
        Ok((request, normalized.report))
    }

    pub fn parse_search_order(&self, response: HttpResponse) -> Result<SearchOrderResponse, ApiError> {
        decode_response(&SEARCH_ORDER, &response)
    }

    /// `order_numbers` and `version` are sent as given; RMS rejects more
    /// than 100 numbers itself.
    pub fn build_get_order(&self, order_numbers: &[String], version: i32) -> Result<HttpRequest, ApiError> {
        let auth = self.auth()?;
        if order_numbers.len() > GET_ORDER_MAX_NUMBERS {
            tracing::warn!(
                count = order_numbers.len(),
                max = GET_ORDER_MAX_NUMBERS,
                "getOrder called with more order numbers than RMS accepts"
            );
        }
        let payload = GetOrderRequest {
            order_number_list: order_numbers.to_vec(),
            version,
        };
        encode_json_request(&self.base_url, &GET_ORDER, auth, &payload)
    }

    pub fn parse_get_order(&self, response: HttpResponse) -> Result<GetOrderResponse, ApiError> {
        decode_response(&GET_ORDER, &response)
    }

    pub fn build_update_order_memo(
        &self,
        order_number: &str,
        cond: &UpdateOrderMemoCondition,
    ) -> Result<HttpRequest, ApiError> {
        self.build_update_order_memo_with_report(order_number, cond)
            .map(|(request, _)| request)
    }

    pub fn build_update_order_memo_with_report(
        &self,
        order_number: &str,
        cond: &UpdateOrderMemoCondition,
    ) -> Result<(HttpRequest, NormalizationReport), ApiError> {
        let auth = self.auth()?;
        let normalized = normalize_order_memo(order_number, cond);
        let request = encode_json_request(&self.base_url, &UPDATE_ORDER_MEMO, auth, &normalized.payload)?;
        Ok((request, normalized.report))
    }

    /// Succeeds only when the leading message is `INFO`.
    pub fn parse_update_order_memo(&self, response: HttpResponse) -> Result<UpdateOrderResponse, ApiError> {
        let envelope: UpdateOrderResponse = decode_response(&UPDATE_ORDER_MEMO, &response)?;
        envelope.ensure_leading_success()?;
        Ok(envelope)
    }

    pub fn build_update_order_shipping(
        &self,
        order_number: &str,
        baskets: &[BasketCondition],
    ) -> Result<HttpRequest, ApiError> {
        self.build_update_order_shipping_with_report(order_number, baskets)
            .map(|(request, _)| request)
    }

    pub fn build_update_order_shipping_with_report(
        &self,
        order_number: &str,
        baskets: &[BasketCondition],
    ) -> Result<(HttpRequest, NormalizationReport), ApiError> {
        let auth = self.auth()?;
        let normalized = normalize_order_shipping(order_number, baskets);
        let request = encode_json_request(&self.base_url, &UPDATE_ORDER_SHIPPING, auth, &normalized.payload)?;
        Ok((request, normalized.report))
    }

    /// Succeeds only when the leading message is `INFO`.
    pub fn parse_update_order_shipping(
        &self,
        response: HttpResponse,
    ) -> Result<UpdateOrderResponse, ApiError> {
        let envelope: UpdateOrderResponse = decode_response(&UPDATE_ORDER_SHIPPING, &response)?;
        envelope.ensure_leading_success()?;
        Ok(envelope)
    }

    pub fn build_shop_calendar(&self, cond: Option<&ShopCalendarCondition>) -> Result<HttpRequest, ApiError> {
        self.build_shop_calendar_with_report(cond).map(|(request, _)| request)
    }

    pub fn build_shop_calendar_with_report(
        &self,
        cond: Option<&ShopCalendarCondition>,
    ) -> Result<(HttpRequest, NormalizationReport), ApiError> {
        let auth = self.auth()?;
        let normalized = normalize_shop_calendar(cond);
        let request = encode_query_request(
            &self.base_url,
            &SHOP_CALENDAR,
            auth,
            &normalized.payload.to_pairs(),
        );
        Ok((request, normalized.report))
    }

    /// Decodes the XML body and derives the typed calendar dates.
    pub fn parse_shop_calendar(&self, response: HttpResponse) -> Result<ShopBizApiResponse, ApiError> {
        decode_response(&SHOP_CALENDAR, &response)
    }
}
