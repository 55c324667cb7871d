//! In-memory stand-in for the RMS order and shop-calendar endpoints.
//!
//! Wire shapes are written out by hand here, not shared with the core
//! crate, so integration tests catch schema drift between the two.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const SERVICE_SECRET: &str = "SP338531_mockSecret";
pub const LICENSE_KEY: &str = "SL338531_mockLicense";

#[derive(Clone, Debug, PartialEq)]
pub struct Shipping {
    pub shipping_detail_id: i64,
    pub delivery_company: Option<String>,
    pub shipping_number: Option<String>,
    pub shipping_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Basket {
    pub basket_id: i64,
    pub shippings: Vec<Shipping>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub order_number: String,
    pub order_progress: i32,
    pub order_datetime: String,
    pub settlement_method: i32,
    pub settlement_name: String,
    pub sub_status_id: Option<i64>,
    pub delivery_class: Option<i32>,
    pub delivery_date: Option<String>,
    pub shipping_term: Option<i32>,
    pub memo: Option<String>,
    pub operator: Option<String>,
    pub mail_plug_sentence: Option<String>,
    pub baskets: Vec<Basket>,
}

impl Order {
    fn to_model(&self) -> Value {
        let packages: Vec<Value> = self
            .baskets
            .iter()
            .map(|b| {
                let shippings: Vec<Value> = b
                    .shippings
                    .iter()
                    .map(|s| {
                        json!({
                            "shippingDetailId": s.shipping_detail_id,
                            "shippingNumber": s.shipping_number,
                            "deliveryCompany": s.delivery_company,
                            "shippingDate": s.shipping_date,
                        })
                    })
                    .collect();
                json!({
                    "basketId": b.basket_id,
                    "packageDeleteFlag": 0,
                    "SenderModel": {"familyName": "楽天", "firstName": "太郎", "prefecture": "東京都"},
                    "ItemModelList": [],
                    "ShippingModelList": shippings,
                })
            })
            .collect();
        json!({
            "orderNumber": self.order_number,
            "orderProgress": self.order_progress,
            "subStatusId": self.sub_status_id,
            "orderDatetime": self.order_datetime,
            "deliveryDate": self.delivery_date,
            "shippingTerm": self.shipping_term,
            "memo": self.memo,
            "operator": self.operator,
            "mailPlugSentence": self.mail_plug_sentence,
            "OrdererModel": {"familyName": "楽天", "firstName": "花子", "emailAddress": "buyer@example.com"},
            "SettlementModel": {"settlementMethod": self.settlement_name},
            "DeliveryModel": {"deliveryName": "宅配便", "deliveryClass": self.delivery_class},
            "PackageModelList": packages,
            "CouponModelList": null,
            "ChangeReasonModelList": null,
        })
    }
}

pub type Db = Arc<RwLock<BTreeMap<String, Order>>>;

#[derive(Clone)]
pub struct AppState {
    authorization: String,
    pub orders: Db,
}

impl AppState {
    pub fn new(service_secret: &str, license_key: &str) -> Self {
        let orders = seed_orders()
            .into_iter()
            .map(|o| (o.order_number.clone(), o))
            .collect();
        Self {
            authorization: format!("ESA {}", STANDARD.encode(format!("{service_secret}:{license_key}"))),
            orders: Arc::new(RwLock::new(orders)),
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == self.authorization)
    }
}

fn order(number: u32, progress: i32, datetime: &str, settlement: (i32, &str), basket_id: i64) -> Order {
    Order {
        order_number: format!("338531-20200501-{number:08}"),
        order_progress: progress,
        order_datetime: datetime.to_string(),
        settlement_method: settlement.0,
        settlement_name: settlement.1.to_string(),
        sub_status_id: None,
        delivery_class: None,
        delivery_date: None,
        shipping_term: None,
        memo: None,
        operator: None,
        mail_plug_sentence: None,
        baskets: vec![Basket {
            basket_id,
            shippings: Vec::new(),
        }],
    }
}

/// Fixture orders placed on 2020-05-01..03.
pub fn seed_orders() -> Vec<Order> {
    let mut shipped = order(3, 500, "2020-05-03T09:15:00+0900", (1, "クレジットカード"), 10003);
    shipped.baskets[0].shippings.push(Shipping {
        shipping_detail_id: 1,
        delivery_company: Some("1001".to_string()),
        shipping_number: Some("123456789012".to_string()),
        shipping_date: Some("2020-05-04".to_string()),
    });
    vec![
        order(1, 100, "2020-05-01T10:00:00+0900", (1, "クレジットカード"), 10001),
        order(2, 300, "2020-05-02T12:30:00+0900", (2, "代金引換"), 10002),
        shipped,
    ]
}

pub fn app() -> Router {
    app_with_state(AppState::new(SERVICE_SECRET, LICENSE_KEY))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/es/2.0/order/searchOrder/", post(search_order))
        .route("/es/2.0/order/getOrder/", post(get_order))
        .route("/es/2.0/order/updateOrderMemo/", post(update_order_memo))
        .route("/es/2.0/order/updateOrderShipping/", post(update_order_shipping))
        .route("/es/1.0/shop/shopCalendar", get(shop_calendar))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn message(kind: &str, code: &str, text: &str) -> Value {
    json!({"messageType": kind, "messageCode": code, "message": text})
}

fn order_message(kind: &str, code: &str, text: &str, order_number: &str) -> Value {
    json!({"messageType": kind, "messageCode": code, "message": text, "orderNumber": order_number})
}

/// RMS answers a bad credential with no messages at all.
fn unauthorized() -> Response {
    tracing::debug!("rejected credential");
    (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response()
}

fn rejected(code: &str, text: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"MessageModelList": [message("ERROR", code, text)]})),
    )
        .into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchOrderBody {
    date_type: i32,
    start_datetime: String,
    end_datetime: String,
    #[serde(default)]
    order_progress_list: Vec<i32>,
    settlement_method: Option<i32>,
    #[serde(rename = "PaginationRequestModel")]
    pagination: Option<PaginationBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationBody {
    request_records_amount: Option<usize>,
    request_page: Option<usize>,
    #[serde(rename = "SortModelList", default)]
    sort_model_list: Vec<SortBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SortBody {
    sort_column: i32,
    sort_direction: i32,
}

async fn search_order(State(state): State<AppState>, headers: HeaderMap, body: String) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let Ok(input) = serde_json::from_str::<SearchOrderBody>(&body) else {
        return rejected("ORDER_EXT_API_SEARCH_ORDER_ERROR_001", "Invalid request body.");
    };
    if !(1..=6).contains(&input.date_type) {
        return rejected("ORDER_EXT_API_SEARCH_ORDER_ERROR_014", "dateType is invalid.");
    }

    let orders = state.orders.read().await;
    let mut hits: Vec<&Order> = orders
        .values()
        .filter(|o| input.date_type != 1 || (input.start_datetime <= o.order_datetime && o.order_datetime <= input.end_datetime))
        .filter(|o| input.order_progress_list.is_empty() || input.order_progress_list.contains(&o.order_progress))
        .filter(|o| input.settlement_method.is_none_or(|m| m == o.settlement_method))
        .collect();
    hits.sort_by(|a, b| a.order_datetime.cmp(&b.order_datetime));

    let (amount, page, descending) = match &input.pagination {
        Some(p) => (
            p.request_records_amount.unwrap_or(30),
            p.request_page.unwrap_or(1).max(1),
            p.sort_model_list.first().is_some_and(|s| s.sort_column == 1 && s.sort_direction == 2),
        ),
        None => (30, 1, false),
    };
    if descending {
        hits.reverse();
    }
    let total = hits.len();
    let numbers: Vec<&str> = hits
        .iter()
        .skip((page - 1) * amount)
        .take(amount)
        .map(|o| o.order_number.as_str())
        .collect();
    let total_pages = if amount == 0 { 0 } else { total.div_ceil(amount) };

    Json(json!({
        "MessageModelList": [message("INFO", "ORDER_EXT_API_SEARCH_ORDER_INFO_101", "受注検索に成功しました。")],
        "orderNumberList": numbers,
        "PaginationResponseModel": {
            "totalRecordsAmount": total,
            "totalPages": total_pages,
            "requestPage": page,
        },
    }))
    .into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetOrderBody {
    #[serde(default)]
    order_number_list: Vec<String>,
    version: Option<i32>,
}

async fn get_order(State(state): State<AppState>, headers: HeaderMap, body: String) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let Ok(input) = serde_json::from_str::<GetOrderBody>(&body) else {
        return rejected("ORDER_EXT_API_GET_ORDER_ERROR_001", "Invalid request body.");
    };
    if input.order_number_list.is_empty() {
        return rejected("ORDER_EXT_API_GET_ORDER_ERROR_001", "orderNumberList is empty.");
    }
    if input.order_number_list.len() > 100 {
        return rejected("ORDER_EXT_API_GET_ORDER_ERROR_002", "orderNumberList exceeds 100 entries.");
    }
    if input.version.is_none() {
        return rejected("ORDER_EXT_API_GET_ORDER_ERROR_003", "version is required.");
    }

    let orders = state.orders.read().await;
    let mut messages = Vec::new();
    let mut models = Vec::new();
    for number in &input.order_number_list {
        match orders.get(number) {
            Some(o) => {
                messages.push(order_message("INFO", "ORDER_EXT_API_GET_ORDER_INFO_101", "受注情報取得に成功しました。", number));
                models.push(o.to_model());
            }
            None => messages.push(order_message(
                "ERROR",
                "ORDER_EXT_API_GET_ORDER_ERROR_004",
                "Order not found.",
                number,
            )),
        }
    }
    Json(json!({"MessageModelList": messages, "OrderModelList": models})).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMemoBody {
    order_number: String,
    sub_status_id: Option<i64>,
    delivery_class: Option<i32>,
    delivery_date: Option<String>,
    shipping_term: Option<i32>,
    memo: Option<String>,
    operator: Option<String>,
    mail_plug_sentence: Option<String>,
}

async fn update_order_memo(State(state): State<AppState>, headers: HeaderMap, body: String) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let Ok(input) = serde_json::from_str::<UpdateMemoBody>(&body) else {
        return rejected("ORDER_EXT_API_UPDATE_ORDERMEMO_ERROR_001", "Invalid request body.");
    };
    let mut orders = state.orders.write().await;
    let Some(order) = orders.get_mut(&input.order_number) else {
        return rejected("ORDER_EXT_API_UPDATE_ORDERMEMO_ERROR_007", "Order not found.");
    };
    if input.sub_status_id.is_some() {
        order.sub_status_id = input.sub_status_id;
    }
    if input.delivery_class.is_some() {
        order.delivery_class = input.delivery_class;
    }
    if input.delivery_date.is_some() {
        order.delivery_date = input.delivery_date;
    }
    if input.shipping_term.is_some() {
        order.shipping_term = input.shipping_term;
    }
    if input.memo.is_some() {
        order.memo = input.memo;
    }
    if input.operator.is_some() {
        order.operator = input.operator;
    }
    if input.mail_plug_sentence.is_some() {
        order.mail_plug_sentence = input.mail_plug_sentence;
    }
    tracing::info!(order_number = %order.order_number, "memo updated");
    Json(json!({"MessageModelList": [order_message(
        "INFO",
        "ORDER_EXT_API_UPDATE_ORDERMEMO_INFO_101",
        "受注情報の更新に成功しました。",
        &order.order_number,
    )]}))
    .into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateShippingBody {
    order_number: String,
    #[serde(rename = "BasketidModelList", default)]
    baskets: Vec<BasketBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BasketBody {
    basket_id: i64,
    #[serde(rename = "ShippingModelList", default)]
    shippings: Vec<ShippingBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShippingBody {
    shipping_detail_id: Option<i64>,
    delivery_company: Option<String>,
    shipping_number: Option<String>,
    shipping_date: Option<String>,
    shipping_delete_flag: Option<i32>,
}

fn apply_shipping(basket: &mut Basket, input: ShippingBody) {
    let existing = input
        .shipping_detail_id
        .and_then(|id| basket.shippings.iter().position(|s| s.shipping_detail_id == id));
    match existing {
        Some(i) if input.shipping_delete_flag == Some(1) => {
            basket.shippings.remove(i);
        }
        Some(i) => {
            let s = &mut basket.shippings[i];
            if input.delivery_company.is_some() {
                s.delivery_company = input.delivery_company;
            }
            if input.shipping_number.is_some() {
                s.shipping_number = input.shipping_number;
            }
            if input.shipping_date.is_some() {
                s.shipping_date = input.shipping_date;
            }
        }
        None => {
            let next = basket.shippings.iter().map(|s| s.shipping_detail_id).max().unwrap_or(0) + 1;
            basket.shippings.push(Shipping {
                shipping_detail_id: next,
                delivery_company: input.delivery_company,
                shipping_number: input.shipping_number,
                shipping_date: input.shipping_date,
            });
        }
    }
}

async fn update_order_shipping(State(state): State<AppState>, headers: HeaderMap, body: String) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let Ok(input) = serde_json::from_str::<UpdateShippingBody>(&body) else {
        return rejected("ORDER_EXT_API_UPDATE_ORDERSHIPPING_ERROR_001", "Invalid request body.");
    };
    let mut orders = state.orders.write().await;
    let Some(order) = orders.get_mut(&input.order_number) else {
        return rejected("ORDER_EXT_API_UPDATE_ORDERSHIPPING_ERROR_007", "Order not found.");
    };
    if input
        .baskets
        .iter()
        .any(|b| !order.baskets.iter().any(|ob| ob.basket_id == b.basket_id))
    {
        return rejected("ORDER_EXT_API_UPDATE_ORDERSHIPPING_ERROR_011", "basketId not found.");
    }
    for basket_input in input.baskets {
        if let Some(basket) = order.baskets.iter_mut().find(|b| b.basket_id == basket_input.basket_id) {
            for shipping in basket_input.shippings {
                apply_shipping(basket, shipping);
            }
        }
    }
    tracing::info!(order_number = %order.order_number, "shipping updated");
    Json(json!({"MessageModelList": [order_message(
        "INFO",
        "ORDER_EXT_API_UPDATE_ORDERSHIPPING_INFO_101",
        "発送情報の更新に成功しました。",
        &order.order_number,
    )]}))
    .into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarQuery {
    from_date: Option<String>,
    period: Option<i64>,
}

fn xml(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body).into_response()
}

fn calendar_error(code: &str, text: &str, field: &str) -> Response {
    xml(
        StatusCode::BAD_REQUEST,
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><result><resultCode>{code}</resultCode>\
             <resultMessageList><resultMessage><code>{code}</code><message>{text}</message>\
             <fieldId>{field}</fieldId></resultMessage></resultMessageList></result>"
        ),
    )
}

/// Calendar for May 2020 with a 2020-05-15 closure.
pub const CALENDAR_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
  <resultCode>N000</resultCode>
  <resultMessageList>
    <resultMessage><code>N000</code><message>Succeeded.</message></resultMessage>
  </resultMessageList>
  <shopCalendarBizModel>
    <shopCalendar>
      <businessHoliday>
        <regularSchedule><regularSchedule>SUN</regularSchedule><regularSchedule>SAT</regularSchedule></regularSchedule>
        <eventDates><eventDates>20200515</eventDates></eventDates>
      </businessHoliday>
      <shippingHoliday>
        <eventDates><eventDates>20200505</eventDates><eventDates>20200506</eventDates></eventDates>
      </shippingHoliday>
      <shippingOnly/>
      <shopHoliday>
        <title>GW休業のお知らせ</title>
        <message>5月5日から5月6日まで発送をお休みします。</message>
        <mailMessage>発送は5月7日より順次行います。</mailMessage>
        <stimestampYmd>2020-05-01T00:00:00+0900</stimestampYmd>
        <etimestampYmd>2020-05-07T00:00:00+0900</etimestampYmd>
        <stimestampMailYmd>2020-05-01T00:00:00+0900</stimestampMailYmd>
        <etimestampMailYmd>2020-05-07T00:00:00+0900</etimestampMailYmd>
      </shopHoliday>
    </shopCalendar>
  </shopCalendarBizModel>
</result>"#;

async fn shop_calendar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CalendarQuery>,
) -> Response {
    if !state.authorized(&headers) {
        tracing::debug!("rejected credential");
        return xml(
            StatusCode::UNAUTHORIZED,
            "<result><resultMessageList></resultMessageList></result>".to_string(),
        );
    }
    if query.period.is_some_and(|p| !(1..=180).contains(&p)) {
        return calendar_error("C001", "period is out of range.", "period");
    }
    if query.from_date.as_deref().is_some_and(|d| d.len() != 10) {
        return calendar_error("C002", "fromDate is invalid.", "fromDate");
    }
    xml(StatusCode::OK, CALENDAR_XML.to_string())
}
