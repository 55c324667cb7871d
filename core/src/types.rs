//! Response DTOs for the Rakuten Pay order API.
//!
//! # Design
//! These mirror the remote JSON schema field for field and carry no logic.
//! Field names follow RMS exactly, including its mix of `camelCase` scalars
//! and `PascalCase` list/model keys. Every struct defaults missing keys, and
//! lists and scalars tolerate an explicit `null`, because RMS omits or nulls fields
//! depending on the requested `version`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::datetime::{JsonDate, JsonTime};

/// Deserialize a list that RMS may send as `null`.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize a value that RMS may send as `null` into its default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One entry of `MessageModelList`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageModel {
    /// `INFO`, `ERROR` or `WARNING`.
    #[serde(deserialize_with = "null_default")]
    pub message_type: String,
    #[serde(deserialize_with = "null_default")]
    pub message_code: String,
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    /// Present on getOrder / update responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
}

impl MessageModel {
    pub fn is_info(&self) -> bool {
        self.message_type == "INFO"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationResponseModel {
    #[serde(deserialize_with = "null_default")]
    pub total_records_amount: i64,
    #[serde(deserialize_with = "null_default")]
    pub total_pages: i64,
    #[serde(deserialize_with = "null_default")]
    pub request_page: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOrderResponse {
    #[serde(rename = "MessageModelList", deserialize_with = "nullable_vec")]
    pub message_model_list: Vec<MessageModel>,
    #[serde(rename = "orderNumberList", deserialize_with = "nullable_vec")]
    pub order_number_list: Vec<String>,
    #[serde(rename = "PaginationResponseModel")]
    pub pagination: Option<PaginationResponseModel>,
}

/// `OrdererModel`: the purchaser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrdererModel {
    #[serde(deserialize_with = "null_default")]
    pub zip_code1: String,
    #[serde(deserialize_with = "null_default")]
    pub zip_code2: String,
    #[serde(deserialize_with = "null_default")]
    pub prefecture: String,
    #[serde(deserialize_with = "null_default")]
    pub city: String,
    #[serde(deserialize_with = "null_default")]
    pub sub_address: String,
    #[serde(deserialize_with = "null_default")]
    pub family_name: String,
    #[serde(deserialize_with = "null_default")]
    pub first_name: String,
    pub family_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub phone_number3: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub email_address: String,
    pub sex: Option<String>,
    pub birth_year: Option<i32>,
    pub birth_month: Option<i32>,
    pub birth_day: Option<i32>,
}

/// `SettlementModel`: how the order is paid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettlementModel {
    #[serde(deserialize_with = "null_default")]
    pub settlement_method: String,
    pub rpay_settlement_flag: Option<i32>,
    pub card_name: Option<String>,
    pub card_number: Option<String>,
    pub card_owner: Option<String>,
    pub card_ym: Option<String>,
    pub card_pay_type: Option<i32>,
    pub card_installment_desc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryModel {
    #[serde(deserialize_with = "null_default")]
    pub delivery_name: String,
    /// 0 none, 1 normal, 2 chilled, 3 frozen, 4-8 shop defined.
    pub delivery_class: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointModel {
    #[serde(deserialize_with = "null_default")]
    pub used_point: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WrappingModel {
    /// 1 wrapping paper, 2 ribbon.
    #[serde(deserialize_with = "null_default")]
    pub title: i32,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub price: Option<i64>,
    #[serde(deserialize_with = "null_default")]
    pub include_tax_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub delete_wrapping_flag: i32,
    pub tax_rate: Option<f64>,
    pub tax_price: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SenderModel {
    #[serde(deserialize_with = "null_default")]
    pub zip_code1: String,
    #[serde(deserialize_with = "null_default")]
    pub zip_code2: String,
    #[serde(deserialize_with = "null_default")]
    pub prefecture: String,
    #[serde(deserialize_with = "null_default")]
    pub city: String,
    #[serde(deserialize_with = "null_default")]
    pub sub_address: String,
    #[serde(deserialize_with = "null_default")]
    pub family_name: String,
    pub first_name: Option<String>,
    pub family_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub phone_number3: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub isolated_island_flag: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemModel {
    #[serde(deserialize_with = "null_default")]
    pub item_detail_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub item_name: String,
    #[serde(deserialize_with = "null_default")]
    pub item_id: i64,
    pub item_number: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub manage_number: String,
    #[serde(deserialize_with = "null_default")]
    pub price: i64,
    #[serde(deserialize_with = "null_default")]
    pub units: i64,
    #[serde(deserialize_with = "null_default")]
    pub include_postage_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub include_tax_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub include_cash_on_delivery_postage_flag: i32,
    pub selected_choice: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub point_rate: i32,
    #[serde(deserialize_with = "null_default")]
    pub point_type: i32,
    #[serde(deserialize_with = "null_default")]
    pub inventory_type: i32,
    pub delvdate_info: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub restore_inventory_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub deal_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub drug_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub delete_item_flag: i32,
    pub tax_rate: Option<f64>,
    pub price_tax_incl: Option<i64>,
    pub is_single_item_shipping: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingModel {
    #[serde(deserialize_with = "null_default")]
    pub shipping_detail_id: i64,
    pub shipping_number: Option<String>,
    /// "1000".."1028"; see `condition::DELIVERY_COMPANIES`.
    pub delivery_company: Option<String>,
    pub delivery_company_name: Option<String>,
    pub shipping_date: Option<JsonDate>,
}

/// `DeliveryCvsModel`: convenience-store pickup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryCvsModel {
    pub cvs_code: Option<i32>,
    pub store_genre_code: Option<String>,
    pub store_code: Option<String>,
    pub store_name: Option<String>,
    pub store_zip: Option<String>,
    pub store_prefecture: Option<String>,
    pub store_address: Option<String>,
    pub area_code: Option<String>,
    pub depo: Option<String>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub cvs_remarks: Option<String>,
}

/// `PackageModel`: one destination with its items and shipments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageModel {
    #[serde(deserialize_with = "null_default")]
    pub basket_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub postage_price: i64,
    pub postage_tax_rate: Option<f64>,
    #[serde(deserialize_with = "null_default")]
    pub delivery_price: i64,
    pub delivery_tax_rate: Option<f64>,
    #[serde(deserialize_with = "null_default")]
    pub goods_tax: i64,
    #[serde(deserialize_with = "null_default")]
    pub goods_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub total_price: i64,
    pub noshi: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub package_delete_flag: i32,
    #[serde(rename = "SenderModel", deserialize_with = "null_default")]
    pub sender: SenderModel,
    #[serde(rename = "ItemModelList", deserialize_with = "nullable_vec")]
    pub items: Vec<ItemModel>,
    #[serde(rename = "ShippingModelList", deserialize_with = "nullable_vec")]
    pub shippings: Vec<ShippingModel>,
    #[serde(rename = "DeliveryCvsModel")]
    pub delivery_cvs: Option<DeliveryCvsModel>,
    pub default_delivery_company_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CouponModel {
    #[serde(deserialize_with = "null_default")]
    pub coupon_code: String,
    #[serde(deserialize_with = "null_default")]
    pub item_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub coupon_name: String,
    #[serde(deserialize_with = "null_default")]
    pub coupon_summary: String,
    #[serde(deserialize_with = "null_default")]
    pub coupon_capital: String,
    #[serde(deserialize_with = "null_default")]
    pub coupon_capital_code: i32,
    pub expiry_date: Option<JsonDate>,
    #[serde(deserialize_with = "null_default")]
    pub coupon_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub coupon_unit: i64,
    #[serde(deserialize_with = "null_default")]
    pub coupon_total_price: i64,
}

/// `ChangeReasonModel`: one cancellation or modification record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeReasonModel {
    #[serde(deserialize_with = "null_default")]
    pub change_id: i64,
    pub change_type: Option<i32>,
    pub change_type_detail: Option<i32>,
    pub change_reason: Option<i32>,
    pub change_reason_detail: Option<i32>,
    pub change_apply_datetime: Option<JsonTime>,
    pub change_fix_datetime: Option<JsonTime>,
    #[serde(rename = "changeCmplDatetime")]
    pub change_complete_datetime: Option<JsonTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxSummaryModel {
    #[serde(deserialize_with = "null_default")]
    pub tax_rate: f64,
    #[serde(deserialize_with = "null_default")]
    pub req_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub req_price_tax: i64,
    #[serde(deserialize_with = "null_default")]
    pub total_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub payment_charge: i64,
    #[serde(deserialize_with = "null_default")]
    pub coupon_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub point: i64,
}

/// `OrderModel`: one order as returned by getOrder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderModel {
    #[serde(deserialize_with = "null_default")]
    pub order_number: String,
    /// 100 awaiting confirmation … 900 cancelled.
    #[serde(deserialize_with = "null_default")]
    pub order_progress: i32,
    pub sub_status_id: Option<i64>,
    pub sub_status_name: Option<String>,
    pub order_datetime: Option<JsonTime>,
    #[serde(rename = "shopOrderCfmDatetime")]
    pub shop_order_confirm_datetime: Option<JsonTime>,
    pub order_fix_datetime: Option<JsonTime>,
    pub shipping_inst_datetime: Option<JsonTime>,
    #[serde(rename = "shippingCmplRptDatetime")]
    pub shipping_complete_report_datetime: Option<JsonTime>,
    pub cancel_due_date: Option<JsonDate>,
    pub delivery_date: Option<JsonDate>,
    pub shipping_term: Option<i32>,
    pub remarks: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub gift_check_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub several_sender_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub equal_sender_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub isolated_island_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub rakuten_member_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub carrier_code: i32,
    #[serde(deserialize_with = "null_default")]
    pub email_carrier_code: i32,
    #[serde(deserialize_with = "null_default")]
    pub order_type: i32,
    pub reserve_number: Option<String>,
    pub reserve_delivery_count: Option<i32>,
    #[serde(deserialize_with = "null_default")]
    pub caution_display_type: i32,
    #[serde(deserialize_with = "null_default")]
    pub rakuten_confirm_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub goods_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub goods_tax: i64,
    #[serde(deserialize_with = "null_default")]
    pub postage_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub delivery_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub payment_charge: i64,
    pub payment_charge_tax_rate: Option<f64>,
    #[serde(deserialize_with = "null_default")]
    pub total_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub request_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub coupon_all_total_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub coupon_shop_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub coupon_other_price: i64,
    #[serde(deserialize_with = "null_default")]
    pub additional_fee_occur_amount_to_user: i64,
    #[serde(deserialize_with = "null_default")]
    pub additional_fee_occur_amount_to_shop: i64,
    #[serde(deserialize_with = "null_default")]
    pub asuraku_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub drug_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub deal_flag: i32,
    #[serde(deserialize_with = "null_default")]
    pub membership_type: i32,
    pub memo: Option<String>,
    pub operator: Option<String>,
    pub mail_plug_sentence: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub modify_flag: i32,
    pub is_tax_recalc: Option<i32>,
    #[serde(rename = "OrdererModel", deserialize_with = "null_default")]
    pub orderer: OrdererModel,
    #[serde(rename = "SettlementModel")]
    pub settlement: Option<SettlementModel>,
    #[serde(rename = "DeliveryModel", deserialize_with = "null_default")]
    pub delivery: DeliveryModel,
    #[serde(rename = "PointModel")]
    pub point: Option<PointModel>,
    #[serde(rename = "WrappingModel1")]
    pub wrapping1: Option<WrappingModel>,
    #[serde(rename = "WrappingModel2")]
    pub wrapping2: Option<WrappingModel>,
    #[serde(rename = "PackageModelList", deserialize_with = "nullable_vec")]
    pub packages: Vec<PackageModel>,
    #[serde(rename = "CouponModelList", deserialize_with = "nullable_vec")]
    pub coupons: Vec<CouponModel>,
    #[serde(rename = "ChangeReasonModelList", deserialize_with = "nullable_vec")]
    pub change_reasons: Vec<ChangeReasonModel>,
    #[serde(rename = "TaxSummaryModelList", deserialize_with = "nullable_vec")]
    pub tax_summaries: Vec<TaxSummaryModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetOrderResponse {
    #[serde(rename = "MessageModelList", deserialize_with = "nullable_vec")]
    pub message_model_list: Vec<MessageModel>,
    #[serde(rename = "OrderModelList", deserialize_with = "nullable_vec")]
    pub order_model_list: Vec<OrderModel>,
}

/// Response of both update endpoints; only messages come back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateOrderResponse {
    #[serde(rename = "MessageModelList", deserialize_with = "nullable_vec")]
    pub message_model_list: Vec<MessageModel>,
}
