//! Turns sparse caller conditions into complete, wire-ready request payloads.
//!
//! # Design
//! Normalization never fails. Every optional value is either applied,
//! replaced by a default, or dropped, and each decision is written to a
//! `NormalizationReport` so the drop is observable without inspecting the
//! payload. Values outside a field's allowed set are dropped rather than
//! clamped or rejected: RMS adds enum members over time, and a strict client
//! would start failing on requests the server accepts.
//!
//! Allowed sets are plain constants checked by membership.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize, Serializer};

use crate::datetime::{decode_date, JsonDate, JsonTime};

/// 1 credit card … 21 deferred payment (common settlement).
pub const SETTLEMENT_METHODS: &[i32] = &[1, 2, 3, 4, 5, 6, 7, 9, 12, 13, 14, 16, 17, 21];
/// 1 normal, 4 subscription, 5 distribution, 6 reservation.
pub const ORDER_TYPES: &[i32] = &[1, 4, 5, 6];
/// 1 ascending, 2 descending.
pub const SORT_DIRECTIONS: &[i32] = &[1, 2];
pub const SEARCH_KEYWORD_TYPES: &[i32] = &[1, 2, 3, 4, 5, 6];
pub const MAIL_SEND_TYPES: &[i32] = &[1, 2];
/// 1 recipient. The orderer (0) is only sent as the default next to a phone number.
pub const PHONE_NUMBER_TYPES: &[i32] = &[1];
pub const PURCHASE_SITE_TYPES: &[i32] = &[1, 2, 3, 4];
pub const DELIVERY_CLASSES: &[i32] = &[0, 1, 2, 3, 4, 5, 6, 7, 8];
/// Fixed `shippingTerm` values: none, morning, afternoon, other.
pub const SHIPPING_TERMS: &[i32] = &[0, 1, 2, 9];
pub const SHIPPING_DELETE_FLAGS: &[i32] = &[0, 1];
/// 1000 other, 1001 Yamato … 1028 Rakuten EXPRESS.
pub const DELIVERY_COMPANIES: &[&str] = &[
    "1000", "1001", "1002", "1003", "1004", "1005", "1006", "1007", "1008", "1009", "1010", "1011",
    "1012", "1013", "1014", "1015", "1016", "1017", "1018", "1019", "1020", "1021", "1022", "1023",
    "1024", "1025", "1026", "1027", "1028",
];

pub const REQUEST_RECORDS_AMOUNT: RangeInclusive<i64> = 1..=1000;
pub const CALENDAR_PERIOD_DAYS: RangeInclusive<i64> = 1..=180;

pub const DEFAULT_REQUEST_RECORDS_AMOUNT: i64 = 30;
pub const DEFAULT_REQUEST_PAGE: i64 = 1;
/// The only sortable column: order datetime.
pub const SORT_COLUMN_ORDER_DATETIME: i32 = 1;

pub const SEARCH_KEYWORD_MAX_CHARS: usize = 32;
pub const MEMO_MAX_CHARS: usize = 32;
pub const OPERATOR_MAX_CHARS: usize = 6;
pub const MAIL_PLUG_SENTENCE_MAX_CHARS: usize = 1024;

/// Why an optional value did not reach the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmitReason {
    /// Zero, empty or `false`: treated as "not set".
    Unset,
    OutOfRange,
    NotAllowed,
    TooLong,
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Applied,
    /// Not supplied (or dropped) and filled with its default.
    Defaulted,
    Omitted(OmitReason),
}

/// Per-field record of what normalization did, keyed by wire field name.
/// Nested fields use a path such as `BasketidModelList[0].ShippingModelList[1].deliveryCompany`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    entries: Vec<(String, FieldOutcome)>,
}

impl NormalizationReport {
    fn record(&mut self, field: impl Into<String>, outcome: FieldOutcome) {
        let field = field.into();
        if let FieldOutcome::Omitted(reason) = outcome {
            tracing::debug!(field = %field, ?reason, "optional field dropped");
        }
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = outcome,
            None => self.entries.push((field, outcome)),
        }
    }

    pub fn outcome(&self, field: &str) -> Option<FieldOutcome> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, outcome)| *outcome)
    }

    /// Fields that were supplied but dropped.
    pub fn omitted(&self) -> impl Iterator<Item = (&str, OmitReason)> {
        self.entries.iter().filter_map(|(name, outcome)| match outcome {
            FieldOutcome::Omitted(reason) => Some((name.as_str(), *reason)),
            _ => None,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.omitted().next().is_none()
    }
}

/// A payload plus the decisions that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub payload: T,
    pub report: NormalizationReport,
}

fn member<T: PartialEq + Copy>(
    report: &mut NormalizationReport,
    field: &str,
    value: Option<T>,
    allowed: &[T],
) -> Option<T> {
    let value = value?;
    if allowed.contains(&value) {
        report.record(field, FieldOutcome::Applied);
        Some(value)
    } else {
        report.record(field, FieldOutcome::Omitted(OmitReason::NotAllowed));
        None
    }
}

/// Search codes where zero means "not set".
fn search_code(
    report: &mut NormalizationReport,
    field: &str,
    value: Option<i32>,
    allowed: &[i32],
) -> Option<i32> {
    if value == Some(0) {
        report.record(field, FieldOutcome::Omitted(OmitReason::Unset));
        return None;
    }
    member(report, field, value, allowed)
}

fn ranged(
    report: &mut NormalizationReport,
    field: &str,
    value: Option<i64>,
    range: RangeInclusive<i64>,
) -> Option<i64> {
    let value = value?;
    if range.contains(&value) {
        report.record(field, FieldOutcome::Applied);
        Some(value)
    } else {
        report.record(field, FieldOutcome::Omitted(OmitReason::OutOfRange));
        None
    }
}

/// Text where the empty string means "not set".
fn text(report: &mut NormalizationReport, field: &str, value: Option<&str>) -> Option<String> {
    let value = value?;
    if value.is_empty() {
        report.record(field, FieldOutcome::Omitted(OmitReason::Unset));
        return None;
    }
    report.record(field, FieldOutcome::Applied);
    Some(value.to_string())
}

/// Text with a character limit where the empty string is a real value
/// (it clears the field server-side).
fn bounded_text(
    report: &mut NormalizationReport,
    field: &str,
    value: Option<&str>,
    max_chars: usize,
) -> Option<String> {
    let value = value?;
    if value.chars().count() > max_chars {
        report.record(field, FieldOutcome::Omitted(OmitReason::TooLong));
        return None;
    }
    report.record(field, FieldOutcome::Applied);
    Some(value.to_string())
}

/// Search flags are sent as `1` or not at all, never as `0`.
fn flag(report: &mut NormalizationReport, field: &str, value: bool) -> Option<u8> {
    if value {
        report.record(field, FieldOutcome::Applied);
        Some(1)
    } else {
        None
    }
}

/// `dateType`: which order date the search window applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDateType {
    OrderDate = 1,
    OrderConfirmDate = 2,
    OrderFixDate = 3,
    ShippingDate = 4,
    ShippingCompleteReportDate = 5,
    PaymentFixDate = 6,
}

impl SearchDateType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i32> for SearchDateType {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => SearchDateType::OrderDate,
            2 => SearchDateType::OrderConfirmDate,
            3 => SearchDateType::OrderFixDate,
            4 => SearchDateType::ShippingDate,
            5 => SearchDateType::ShippingCompleteReportDate,
            6 => SearchDateType::PaymentFixDate,
            other => return Err(other),
        })
    }
}

impl fmt::Display for SearchDateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for SearchDateType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Optional search criteria. Every field left at its `Default` is absent
/// from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOrderCondition {
    pub sort_direction: Option<i32>,
    pub request_records_amount: Option<i64>,
    pub request_page: Option<i64>,
    /// 100 awaiting confirmation … 900 cancelled.
    pub order_progress_list: Vec<i32>,
    pub sub_status_id_list: Vec<i64>,
    pub order_type_list: Vec<i32>,
    pub settlement_method: Option<i32>,
    pub delivery_name: Option<String>,
    pub shipping_date_blank_flag: bool,
    pub shipping_number_blank_flag: bool,
    pub search_keyword_type: Option<i32>,
    pub search_keyword: Option<String>,
    pub mail_send_type: Option<i32>,
    pub orderer_mail_address: Option<String>,
    pub phone_number_type: Option<i32>,
    pub phone_number: Option<String>,
    pub reserve_number: Option<String>,
    pub purchase_site_type: Option<i32>,
    pub asuraku_flag: bool,
    pub coupon_use_flag: bool,
    pub drug_flag: bool,
    pub overseas_flag: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortModel {
    pub sort_column: i32,
    pub sort_direction: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRequestModel {
    pub request_records_amount: i64,
    pub request_page: i64,
    #[serde(rename = "SortModelList", default, skip_serializing_if = "Vec::is_empty")]
    pub sort_model_list: Vec<SortModel>,
}

impl Default for PaginationRequestModel {
    fn default() -> Self {
        Self {
            request_records_amount: DEFAULT_REQUEST_RECORDS_AMOUNT,
            request_page: DEFAULT_REQUEST_PAGE,
            sort_model_list: Vec::new(),
        }
    }
}

/// Wire body of `searchOrder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOrderRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_progress_list: Vec<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_status_id_list: Vec<i64>,
    pub date_type: SearchDateType,
    pub start_datetime: JsonTime,
    pub end_datetime: JsonTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_type_list: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_method: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_date_blank_flag: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_number_blank_flag: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_keyword_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_send_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderer_mail_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserve_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_site_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asuraku_flag: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_use_flag: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_flag: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overseas_flag: Option<u8>,
    #[serde(rename = "PaginationRequestModel")]
    pub pagination: PaginationRequestModel,
}

impl SearchOrderRequest {
    /// A request with only the mandatory fields and default paging.
    pub fn new(date_type: SearchDateType, start: JsonTime, end: JsonTime) -> Self {
        Self {
            order_progress_list: Vec::new(),
            sub_status_id_list: Vec::new(),
            date_type,
            start_datetime: start,
            end_datetime: end,
            order_type_list: Vec::new(),
            settlement_method: None,
            delivery_name: None,
            shipping_date_blank_flag: None,
            shipping_number_blank_flag: None,
            search_keyword_type: None,
            search_keyword: None,
            mail_send_type: None,
            orderer_mail_address: None,
            phone_number_type: None,
            phone_number: None,
            reserve_number: None,
            purchase_site_type: None,
            asuraku_flag: None,
            coupon_use_flag: None,
            drug_flag: None,
            overseas_flag: None,
            pagination: PaginationRequestModel::default(),
        }
    }
}

/// Build the `searchOrder` body from the mandatory window and an optional
/// condition.
pub fn normalize_search_order(
    date_type: SearchDateType,
    start: JsonTime,
    end: JsonTime,
    cond: Option<&SearchOrderCondition>,
) -> Normalized<SearchOrderRequest> {
    let mut req = SearchOrderRequest::new(date_type, start, end);
    let mut report = NormalizationReport::default();

    let Some(cond) = cond else {
        return Normalized { payload: req, report };
    };
    let r = &mut report;

    // Ascending is the server default, so only descending needs a sort model.
    if member(r, "sortDirection", cond.sort_direction, SORT_DIRECTIONS) == Some(2) {
        req.pagination.sort_model_list.push(SortModel {
            sort_column: SORT_COLUMN_ORDER_DATETIME,
            sort_direction: 2,
        });
    }
    if let Some(amount) = ranged(r, "requestRecordsAmount", cond.request_records_amount, REQUEST_RECORDS_AMOUNT) {
        req.pagination.request_records_amount = amount;
    }
    if let Some(page) = ranged(r, "requestPage", cond.request_page, 1..=i64::MAX) {
        req.pagination.request_page = page;
    }

    if !cond.order_progress_list.is_empty() {
        r.record("orderProgressList", FieldOutcome::Applied);
        req.order_progress_list = cond.order_progress_list.clone();
    }
    if !cond.sub_status_id_list.is_empty() {
        r.record("subStatusIdList", FieldOutcome::Applied);
        req.sub_status_id_list = cond.sub_status_id_list.clone();
    }
    if !cond.order_type_list.is_empty() {
        req.order_type_list = cond
            .order_type_list
            .iter()
            .copied()
            .filter(|t| ORDER_TYPES.contains(t))
            .collect();
        let outcome = if req.order_type_list.is_empty() {
            FieldOutcome::Omitted(OmitReason::NotAllowed)
        } else {
            FieldOutcome::Applied
        };
        r.record("orderTypeList", outcome);
    }

    req.settlement_method = member(r, "settlementMethod", cond.settlement_method, SETTLEMENT_METHODS);
    req.delivery_name = text(r, "deliveryName", cond.delivery_name.as_deref());
    req.shipping_date_blank_flag = flag(r, "shippingDateBlankFlag", cond.shipping_date_blank_flag);
    req.shipping_number_blank_flag = flag(r, "shippingNumberBlankFlag", cond.shipping_number_blank_flag);

    // The keyword travels with its type; an over-long keyword drops both.
    if let Some(kind) = search_code(r, "searchKeywordType", cond.search_keyword_type, SEARCH_KEYWORD_TYPES) {
        let keyword = cond.search_keyword.clone().unwrap_or_default();
        if keyword.chars().count() > SEARCH_KEYWORD_MAX_CHARS {
            r.record("searchKeywordType", FieldOutcome::Omitted(OmitReason::TooLong));
            r.record("searchKeyword", FieldOutcome::Omitted(OmitReason::TooLong));
        } else {
            r.record("searchKeyword", FieldOutcome::Applied);
            req.search_keyword_type = Some(kind);
            req.search_keyword = Some(keyword);
        }
    }

    req.mail_send_type = search_code(r, "mailSendType", cond.mail_send_type, MAIL_SEND_TYPES);
    req.orderer_mail_address = text(r, "ordererMailAddress", cond.orderer_mail_address.as_deref());

    req.phone_number_type = search_code(r, "phoneNumberType", cond.phone_number_type, PHONE_NUMBER_TYPES);
    req.phone_number = text(r, "phoneNumber", cond.phone_number.as_deref());
    if req.phone_number.is_some() && req.phone_number_type.is_none() {
        r.record("phoneNumberType", FieldOutcome::Defaulted);
        req.phone_number_type = Some(0);
    }

    req.reserve_number = text(r, "reserveNumber", cond.reserve_number.as_deref());
    req.purchase_site_type = search_code(r, "purchaseSiteType", cond.purchase_site_type, PURCHASE_SITE_TYPES);
    req.asuraku_flag = flag(r, "asurakuFlag", cond.asuraku_flag);
    req.coupon_use_flag = flag(r, "couponUseFlag", cond.coupon_use_flag);
    req.drug_flag = flag(r, "drugFlag", cond.drug_flag);
    req.overseas_flag = flag(r, "overseasFlag", cond.overseas_flag);

    Normalized { payload: req, report }
}

/// Wire body of `getOrder`. Both fields are mandatory and sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderRequest {
    pub order_number_list: Vec<String>,
    /// 1 = 2018/02 … 4 = 2019/12 schema revision.
    pub version: i32,
}

pub const GET_ORDER_MAX_NUMBERS: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOrderMemoCondition {
    pub sub_status_id: Option<i64>,
    pub delivery_class: Option<i32>,
    pub delivery_date: Option<JsonDate>,
    /// 0, 1, 2, 9, or `h1h2` such as 1012 for 10:00-12:00.
    pub shipping_term: Option<i32>,
    /// `Some("")` clears the memo.
    pub memo: Option<String>,
    pub operator: Option<String>,
    pub mail_plug_sentence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderMemoRequest {
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_status_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_class: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<JsonDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_term: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_plug_sentence: Option<String>,
}

/// A delivery window `h1h2` with 7 <= h1 < h2 <= 24, or one of the fixed terms.
fn is_valid_shipping_term(term: i32) -> bool {
    if SHIPPING_TERMS.contains(&term) {
        return true;
    }
    let (from, to) = (term / 100, term % 100);
    (700..=2424).contains(&term) && (7..=24).contains(&from) && (7..=24).contains(&to) && from < to
}

pub fn normalize_order_memo(
    order_number: &str,
    cond: &UpdateOrderMemoCondition,
) -> Normalized<UpdateOrderMemoRequest> {
    let mut report = NormalizationReport::default();
    let r = &mut report;

    if cond.sub_status_id.is_some() {
        r.record("subStatusId", FieldOutcome::Applied);
    }
    if cond.delivery_date.is_some() {
        r.record("deliveryDate", FieldOutcome::Applied);
    }
    let shipping_term = cond.shipping_term.and_then(|term| {
        if is_valid_shipping_term(term) {
            r.record("shippingTerm", FieldOutcome::Applied);
            Some(term)
        } else {
            r.record("shippingTerm", FieldOutcome::Omitted(OmitReason::NotAllowed));
            None
        }
    });

    let payload = UpdateOrderMemoRequest {
        order_number: order_number.to_string(),
        sub_status_id: cond.sub_status_id,
        delivery_class: member(r, "deliveryClass", cond.delivery_class, DELIVERY_CLASSES),
        delivery_date: cond.delivery_date,
        shipping_term,
        memo: bounded_text(r, "memo", cond.memo.as_deref(), MEMO_MAX_CHARS),
        operator: bounded_text(r, "operator", cond.operator.as_deref(), OPERATOR_MAX_CHARS),
        mail_plug_sentence: bounded_text(
            r,
            "mailPlugSentence",
            cond.mail_plug_sentence.as_deref(),
            MAIL_PLUG_SENTENCE_MAX_CHARS,
        ),
    };
    Normalized { payload, report }
}

/// One shipment row to add, change or delete. Without `shipping_detail_id`
/// RMS adds a new row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingModelCondition {
    pub shipping_detail_id: Option<i64>,
    pub delivery_company: Option<String>,
    /// `Some("")` clears the tracking number.
    pub shipping_number: Option<String>,
    pub shipping_date: Option<JsonDate>,
    pub shipping_delete_flag: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasketCondition {
    pub basket_id: i64,
    pub shipping_models: Vec<ShippingModelCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingModelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_detail_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_date: Option<JsonDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_delete_flag: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketidModel {
    pub basket_id: i64,
    #[serde(rename = "ShippingModelList")]
    pub shipping_model_list: Vec<ShippingModelUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderShippingRequest {
    pub order_number: String,
    #[serde(rename = "BasketidModelList")]
    pub basketid_model_list: Vec<BasketidModel>,
}

pub fn normalize_order_shipping(
    order_number: &str,
    baskets: &[BasketCondition],
) -> Normalized<UpdateOrderShippingRequest> {
    let mut report = NormalizationReport::default();
    let mut basketid_model_list = Vec::with_capacity(baskets.len());

    for (b, basket) in baskets.iter().enumerate() {
        let mut shipping_model_list = Vec::with_capacity(basket.shipping_models.len());
        for (s, row) in basket.shipping_models.iter().enumerate() {
            let path = |field: &str| format!("BasketidModelList[{b}].ShippingModelList[{s}].{field}");
            let delivery_company = row.delivery_company.as_deref().and_then(|company| {
                if DELIVERY_COMPANIES.contains(&company) {
                    report.record(path("deliveryCompany"), FieldOutcome::Applied);
                    Some(company.to_string())
                } else {
                    report.record(path("deliveryCompany"), FieldOutcome::Omitted(OmitReason::NotAllowed));
                    None
                }
            });
            let shipping_delete_flag = member(
                &mut report,
                &path("shippingDeleteFlag"),
                row.shipping_delete_flag,
                SHIPPING_DELETE_FLAGS,
            );
            shipping_model_list.push(ShippingModelUpdate {
                shipping_detail_id: row.shipping_detail_id,
                delivery_company,
                shipping_number: row.shipping_number.clone(),
                shipping_date: row.shipping_date,
                shipping_delete_flag,
            });
        }
        basketid_model_list.push(BasketidModel {
            basket_id: basket.basket_id,
            shipping_model_list,
        });
    }

    Normalized {
        payload: UpdateOrderShippingRequest {
            order_number: order_number.to_string(),
            basketid_model_list,
        },
        report,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopCalendarCondition {
    /// `YYYY-MM-DD`; defaults server-side to today.
    pub from_date: Option<String>,
    /// Days to fetch; defaults server-side to 90.
    pub period: Option<i64>,
}

/// Query string of `shopCalendar`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopCalendarQuery {
    pub from_date: Option<JsonDate>,
    pub period: Option<i64>,
}

impl ShopCalendarQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from_date) = &self.from_date {
            pairs.push(("fromDate", from_date.to_string()));
        }
        if let Some(period) = self.period {
            pairs.push(("period", period.to_string()));
        }
        pairs
    }
}

pub fn normalize_shop_calendar(cond: Option<&ShopCalendarCondition>) -> Normalized<ShopCalendarQuery> {
    let mut report = NormalizationReport::default();
    let mut query = ShopCalendarQuery::default();
    if let Some(cond) = cond {
        query.from_date = match cond.from_date.as_deref() {
            None => None,
            Some("") => {
                report.record("fromDate", FieldOutcome::Omitted(OmitReason::Unset));
                None
            }
            Some(raw) => match decode_date(raw) {
                Ok(date) => {
                    report.record("fromDate", FieldOutcome::Applied);
                    Some(JsonDate::new(date))
                }
                Err(_) => {
                    report.record("fromDate", FieldOutcome::Omitted(OmitReason::Malformed));
                    None
                }
            },
        };
        query.period = ranged(&mut report, "period", cond.period, CALENDAR_PERIOD_DAYS);
    }
    Normalized { payload: query, report }
}
