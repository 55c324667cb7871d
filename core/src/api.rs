//! Operation facade: one `RmsClient` plus one `Transport`.
//!
//! Every method builds its request, performs a single `Transport::execute`
//! and parses the answer. Nothing is retried. Supplied values that were
//! dropped during normalization are logged once per call.

use chrono::NaiveDateTime;

use crate::calendar::ShopBizApiResponse;
use crate::client::RmsClient;
use crate::condition::{
    BasketCondition, NormalizationReport, SearchDateType, SearchOrderCondition, ShopCalendarCondition, UpdateOrderMemoCondition,
};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{GetOrderResponse, SearchOrderResponse, UpdateOrderResponse};

#[derive(Debug)]
pub struct RmsApi<T> {
    client: RmsClient,
    transport: T,
}

impl<T: Transport> RmsApi<T> {
    pub fn new(client: RmsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &RmsClient {
        &self.client
    }

    /// Replace the client with an initialized one.
    pub fn initialize(self, service_secret: &str, license_key: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: self.client.initialize(service_secret, license_key)?,
            transport: self.transport,
        })
    }

    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "dispatching");
        let response = self.transport.execute(&request)?;
        tracing::debug!(status = response.status, url = %request.url, "received");
        Ok(response)
    }

    pub fn search_order(
        &self,
        date_type: SearchDateType,
        start: NaiveDateTime,
        end: NaiveDateTime,
        cond: Option<&SearchOrderCondition>,
    ) -> Result<SearchOrderResponse, ApiError> {
        let (request, report) = self.client.build_search_order_with_report(date_type, start, end, cond)?;
        log_omitted("searchOrder", &report);
        self.client.parse_search_order(self.round_trip(request)?)
    }

    pub fn get_order(&self, order_numbers: &[String], version: i32) -> Result<GetOrderResponse, ApiError> {
        let request = self.client.build_get_order(order_numbers, version)?;
        self.client.parse_get_order(self.round_trip(request)?)
    }

    pub fn update_order_memo(
        &self,
        order_number: &str,
        cond: &UpdateOrderMemoCondition,
    ) -> Result<UpdateOrderResponse, ApiError> {
        let (request, report) = self.client.build_update_order_memo_with_report(order_number, cond)?;
        log_omitted("updateOrderMemo", &report);
        self.client.parse_update_order_memo(self.round_trip(request)?)
    }

    pub fn update_order_shipping(
        &self,
        order_number: &str,
        baskets: &[BasketCondition],
    ) -> Result<UpdateOrderResponse, ApiError> {
        let (request, report) = self.client.build_update_order_shipping_with_report(order_number, baskets)?;
        log_omitted("updateOrderShipping", &report);
        self.client.parse_update_order_shipping(self.round_trip(request)?)
    }

    pub fn get_shop_calendar(&self, cond: Option<&ShopCalendarCondition>) -> Result<ShopBizApiResponse, ApiError> {
        let (request, report) = self.client.build_shop_calendar_with_report(cond)?;
        log_omitted("shopCalendar", &report);
        self.client.parse_shop_calendar(self.round_trip(request)?)
    }
}

/// Names of the supplied fields that did not reach the wire, one warning per call.
fn log_omitted(operation: &str, report: &NormalizationReport) -> Vec<String> {
    let omitted: Vec<String> = report
        .omitted()
        .map(|(field, reason)| format!("{field} ({reason:?})"))
        .collect();
    if !omitted.is_empty() {
        tracing::warn!(operation, fields = ?omitted, "request sent without some supplied values");
    }
    omitted
}

#[cfg(feature = "ureq")]
impl RmsApi<crate::transport::UreqTransport> {
    /// Initialized facade over the blocking `ureq` transport.
    pub fn from_config(config: &crate::config::ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(config.client()?, crate::transport::UreqTransport::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn info_body() -> String {
        r#"{"MessageModelList":[{"messageType":"INFO","messageCode":"ORDER_EXT_API_GET_ORDER_INFO_101","message":"ok"}],"OrderModelList":[]}"#
            .to_string()
    }

    #[test]
    fn uninitialized_facade_never_touches_transport() {
        let calls = Cell::new(0);
        let transport = |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            calls.set(calls.get() + 1);
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: info_body(),
            })
        };
        let api = RmsApi::new(RmsClient::new("http://localhost"), &transport);
        assert!(matches!(api.get_order(&[], 3), Err(ApiError::Uninitialized)));
        assert!(matches!(api.get_shop_calendar(None), Err(ApiError::Uninitialized)));
        assert_eq!(calls.get(), 0);

        let api = api.initialize("s", "k").unwrap();
        assert!(api.get_order(&["1".to_string()], 3).is_ok());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn omitted_fields_are_listed_for_logging() {
        let client = RmsClient::new("http://localhost").initialize("s", "k").unwrap();
        let cond = UpdateOrderMemoCondition {
            memo: Some("x".repeat(40)),
            operator: Some("yamada".into()),
            ..Default::default()
        };
        let (_, report) = client.build_update_order_memo_with_report("1", &cond).unwrap();
        assert_eq!(log_omitted("updateOrderMemo", &report), vec!["memo (TooLong)".to_string()]);

        let (_, report) = client.build_shop_calendar_with_report(None).unwrap();
        assert!(log_omitted("shopCalendar", &report).is_empty());
    }

    #[test]
    fn transport_errors_propagate() {
        let transport =
            |_: &HttpRequest| -> Result<HttpResponse, ApiError> { Err(ApiError::Transport("refused".into())) };
        let client = RmsClient::new("http://localhost").initialize("s", "k").unwrap();
        let api = RmsApi::new(client, transport);
        let err = api
            .update_order_memo("1", &UpdateOrderMemoCondition::default())
            .unwrap_err();
        assert!(err.is_transport());
    }
}
