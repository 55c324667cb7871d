//! Wire envelope codec: endpoint table, request encoding, response decoding.
//!
//! # Design
//! Order endpoints take and return JSON; the shop calendar endpoint is a GET
//! whose answer is XML. Whatever the format, every response carries a message
//! list, and `decode_response` enforces the one rule common to all of them:
//! a decoded envelope with no messages is an error. Whether the leading
//! message must also report success is the caller's decision
//! (`Envelope::ensure_leading_success`).

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{GetOrderResponse, MessageModel, SearchOrderResponse, UpdateOrderResponse};

/// Production host of RMS Web Service.
pub const DEFAULT_BASE_URL: &str = "https://api.rms.rakuten.co.jp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Json,
    Xml,
}

impl WireFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            WireFormat::Json => "application/json; charset=utf-8",
            WireFormat::Xml => "application/xml; charset=utf-8",
        }
    }
}

/// One remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub format: WireFormat,
}

pub const SEARCH_ORDER: Endpoint = Endpoint {
    name: "searchOrder",
    method: HttpMethod::Post,
    path: "/es/2.0/order/searchOrder/",
    format: WireFormat::Json,
};

pub const GET_ORDER: Endpoint = Endpoint {
    name: "getOrder",
    method: HttpMethod::Post,
    path: "/es/2.0/order/getOrder/",
    format: WireFormat::Json,
};

pub const UPDATE_ORDER_MEMO: Endpoint = Endpoint {
    name: "updateOrderMemo",
    method: HttpMethod::Post,
    path: "/es/2.0/order/updateOrderMemo/",
    format: WireFormat::Json,
};

pub const UPDATE_ORDER_SHIPPING: Endpoint = Endpoint {
    name: "updateOrderShipping",
    method: HttpMethod::Post,
    path: "/es/2.0/order/updateOrderShipping/",
    format: WireFormat::Json,
};

pub const SHOP_CALENDAR: Endpoint = Endpoint {
    name: "shopCalendar",
    method: HttpMethod::Get,
    path: "/es/1.0/shop/shopCalendar",
    format: WireFormat::Xml,
};

/// Precomputed `ESA` credential: `base64(serviceSecret:licenseKey)`.
#[derive(Clone, PartialEq, Eq)]
pub struct Authorization {
    token: String,
}

impl Authorization {
    pub fn from_credentials(service_secret: &str, license_key: &str) -> Self {
        Self {
            token: STANDARD.encode(format!("{service_secret}:{license_key}")),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value of the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("ESA {}", self.token)
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Authorization(ESA ***)")
    }
}

fn headers(endpoint: &Endpoint, auth: &Authorization) -> Vec<(String, String)> {
    vec![
        ("Authorization".to_string(), auth.header_value()),
        ("Content-Type".to_string(), endpoint.format.content_type().to_string()),
    ]
}

/// Build a request whose payload is a JSON body.
pub fn encode_json_request<P: Serialize>(
    base_url: &str,
    endpoint: &Endpoint,
    auth: &Authorization,
    payload: &P,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method: endpoint.method,
        url: format!("{base_url}{}", endpoint.path),
        headers: headers(endpoint, auth),
        body: Some(body),
    })
}

/// Build a body-less request whose payload is a query string.
pub fn encode_query_request(
    base_url: &str,
    endpoint: &Endpoint,
    auth: &Authorization,
    query: &[(&str, String)],
) -> HttpRequest {
    let mut url = format!("{base_url}{}", endpoint.path);
    for (i, (key, value)) in query.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(value);
    }
    HttpRequest {
        method: endpoint.method,
        url,
        headers: headers(endpoint, auth),
        body: None,
    }
}

/// A status entry inside a response envelope.
pub trait ResultMessage {
    fn is_success(&self) -> bool;
    /// `INFO` / `ERROR` / `WARNING` style classifier.
    fn kind(&self) -> &str;
    fn code(&self) -> &str;
    fn text(&self) -> &str;
}

impl ResultMessage for MessageModel {
    fn is_success(&self) -> bool {
        self.is_info()
    }

    fn kind(&self) -> &str {
        &self.message_type
    }

    fn code(&self) -> &str {
        &self.message_code
    }

    fn text(&self) -> &str {
        &self.message
    }
}

/// A decoded response whose message list is the authoritative outcome.
pub trait Envelope: DeserializeOwned {
    type Message: ResultMessage;

    fn messages(&self) -> &[Self::Message];

    /// Whether the body carried a message list at all. Only a list that is
    /// present and empty is an error.
    fn has_message_list(&self) -> bool {
        true
    }

    /// Derived-field pass run right after structural decoding.
    fn after_decode(&mut self) {}

    fn leading_message(&self) -> Option<&Self::Message> {
        self.messages().first()
    }

    /// Fail unless the first message reports success.
    fn ensure_leading_success(&self) -> Result<(), ApiError> {
        match self.leading_message() {
            None => Err(ApiError::EmptyMessageList),
            Some(m) if m.is_success() => Ok(()),
            Some(m) => Err(ApiError::Rejected {
                message_type: m.kind().to_string(),
                code: m.code().to_string(),
                message: m.text().to_string(),
            }),
        }
    }
}

impl Envelope for SearchOrderResponse {
    type Message = MessageModel;

    fn messages(&self) -> &[MessageModel] {
        &self.message_model_list
    }
}

impl Envelope for GetOrderResponse {
    type Message = MessageModel;

    fn messages(&self) -> &[MessageModel] {
        &self.message_model_list
    }
}

impl Envelope for UpdateOrderResponse {
    type Message = MessageModel;

    fn messages(&self) -> &[MessageModel] {
        &self.message_model_list
    }
}

/// Decode a raw body in the given format, then run the derived-field pass.
pub fn decode_body<E: Envelope>(format: WireFormat, body: &str) -> Result<E, ApiError> {
    let mut envelope: E = match format {
        WireFormat::Json => serde_json::from_str(body)?,
        WireFormat::Xml => quick_xml::de::from_str(body)?,
    };
    envelope.after_decode();
    Ok(envelope)
}

/// Turn a transport response into an envelope.
///
/// Non-2xx responses are still decoded when they carry a body, since RMS
/// explains rejections in the message list.
pub fn decode_response<E: Envelope>(endpoint: &Endpoint, response: &HttpResponse) -> Result<E, ApiError> {
    if !response.is_success() && response.body.trim().is_empty() {
        return Err(ApiError::HttpStatus {
            status: response.status,
        });
    }
    let envelope: E = decode_body(endpoint.format, &response.body)?;
    if envelope.has_message_list() && envelope.messages().is_empty() {
        tracing::debug!(endpoint = endpoint.name, status = response.status, "empty message list");
        return Err(ApiError::EmptyMessageList);
    }
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ShopBizApiResponse;

    fn auth() -> Authorization {
        Authorization::from_credentials("SP338531_abc", "SL338531_xyz")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn authorization_is_base64_of_secret_colon_key() {
        let auth = Authorization::from_credentials("secret", "key");
        assert_eq!(auth.token(), "c2VjcmV0OmtleQ==");
        assert_eq!(auth.header_value(), "ESA c2VjcmV0OmtleQ==");
        assert_eq!(format!("{auth:?}"), "Authorization(ESA ***)");
    }

    #[test]
    fn json_request_carries_headers_and_body() {
        let req = encode_json_request(
            "http://localhost:3000",
            &GET_ORDER,
            &auth(),
            &serde_json::json!({"orderNumberList": [], "version": 3}),
        )
        .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/es/2.0/order/getOrder/");
        assert_eq!(req.header("content-type"), Some("application/json; charset=utf-8"));
        assert!(req.header("authorization").unwrap().starts_with("ESA "));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["version"], 3);
    }

    #[test]
    fn query_request_appends_pairs() {
        let req = encode_query_request(
            DEFAULT_BASE_URL,
            &SHOP_CALENDAR,
            &auth(),
            &[("fromDate", "2020-05-15".to_string()), ("period", "30".to_string())],
        );
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "https://api.rms.rakuten.co.jp/es/1.0/shop/shopCalendar?fromDate=2020-05-15&period=30"
        );
        assert_eq!(req.header("Content-Type"), Some("application/xml; charset=utf-8"));
        assert!(req.body.is_none());

        let bare = encode_query_request(DEFAULT_BASE_URL, &SHOP_CALENDAR, &auth(), &[]);
        assert_eq!(bare.url, "https://api.rms.rakuten.co.jp/es/1.0/shop/shopCalendar");
    }

    #[test]
    fn empty_message_list_is_an_error() {
        let err = decode_response::<SearchOrderResponse>(&SEARCH_ORDER, &response(200, "{}")).unwrap_err();
        assert!(matches!(err, ApiError::EmptyMessageList));
    }

    #[test]
    fn calendar_without_message_list_decodes() {
        let ok = response(200, "<result><resultCode>N000</resultCode></result>");
        let resp = decode_response::<ShopBizApiResponse>(&SHOP_CALENDAR, &ok).unwrap();
        assert!(resp.result_message_list.is_none());
        assert!(resp.messages().is_empty());

        let empty = response(401, "<result><resultMessageList></resultMessageList></result>");
        let err = decode_response::<ShopBizApiResponse>(&SHOP_CALENDAR, &empty).unwrap_err();
        assert!(matches!(err, ApiError::EmptyMessageList));
    }

    #[test]
    fn non_2xx_without_body_is_a_transport_error() {
        let err = decode_response::<SearchOrderResponse>(&SEARCH_ORDER, &response(502, "  ")).unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { status: 502 }));
    }

    #[test]
    fn non_2xx_with_messages_is_returned_for_inspection() {
        let body = r#"{"MessageModelList":[{"messageType":"ERROR","messageCode":"ORDER_EXT_API_GET_ORDER_ERROR_001","message":"orderNumberList is empty"}]}"#;
        let env: GetOrderResponse = decode_response(&GET_ORDER, &response(400, body)).unwrap();
        assert_eq!(env.leading_message().unwrap().kind(), "ERROR");
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode_response::<GetOrderResponse>(&GET_ORDER, &response(200, "<html>")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn leading_message_decides_success() {
        let ok: UpdateOrderResponse = serde_json::from_str(
            r#"{"MessageModelList":[{"messageType":"INFO","messageCode":"I","message":"done"}]}"#,
        )
        .unwrap();
        assert!(ok.ensure_leading_success().is_ok());

        let rejected: UpdateOrderResponse = serde_json::from_str(
            r#"{"MessageModelList":[{"messageType":"WARNING","messageCode":"W1","message":"memo too long"},{"messageType":"INFO","messageCode":"I","message":"x"}]}"#,
        )
        .unwrap();
        match rejected.ensure_leading_success().unwrap_err() {
            ApiError::Rejected {
                message_type,
                code,
                message,
            } => {
                assert_eq!(message_type, "WARNING");
                assert_eq!(code, "W1");
                assert_eq!(message, "memo too long");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
