//! Shop business-calendar response (XML) and its date post-processing.
//!
//! # Design
//! The calendar schema carries every date as a string. Decoding is split in
//! two passes: `quick_xml` fills the raw string fields, then
//! `post_process_calendar` derives the typed dates from them. The raw strings
//! stay on the structs so nothing the server sent is lost, and entries that do
//! not parse are collected in `rejected_*` fields instead of failing the
//! whole response.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::datetime::{decode_compact_date, decode_datetime, JsonTime};
use crate::envelope::{decode_body, Envelope, ResultMessage, WireFormat};
use crate::error::ApiError;

/// Result code of a successful call.
pub const SUCCESS_CODE: &str = "N000";

/// One `<resultMessage>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarResultMessage {
    /// `N000` success, `C0xx` client error, `E0xx`/`S9xx` server side.
    pub code: String,
    pub message: String,
    /// Offending parameter, set for validation errors only.
    pub field_id: Option<String>,
}

impl ResultMessage for CalendarResultMessage {
    fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    fn kind(&self) -> &str {
        if self.is_success() {
            "INFO"
        } else {
            "ERROR"
        }
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn text(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResultMessageList {
    #[serde(rename = "resultMessage")]
    pub list: Vec<CalendarResultMessage>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct EventDateStrings {
    #[serde(rename = "eventDates")]
    items: Vec<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RegularScheduleStrings {
    #[serde(rename = "regularSchedule")]
    items: Vec<String>,
}

fn event_date_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    EventDateStrings::deserialize(deserializer).map(|wrapper| wrapper.items)
}

fn regular_schedule_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    RegularScheduleStrings::deserialize(deserializer).map(|wrapper| wrapper.items)
}

/// A holiday or business-day rule: recurring weekdays and/or explicit dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalendarEvent {
    /// Recurring weekday pattern as sent by RMS.
    #[serde(rename = "regularSchedule", deserialize_with = "regular_schedule_strings")]
    pub regular_schedule: Vec<String>,
    /// Raw `YYYYMMDD` strings.
    #[serde(rename = "eventDates", deserialize_with = "event_date_strings")]
    pub event_date_strs: Vec<String>,
    #[serde(skip)]
    pub event_dates: Vec<NaiveDate>,
    /// Raw entries of `event_date_strs` that are not valid dates.
    #[serde(skip)]
    pub rejected_event_dates: Vec<String>,
}

/// Long-vacation announcement for the web storefront and for mails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopHoliday {
    pub title: String,
    pub message: String,
    pub mail_message: String,
    pub stimestamp_ymd: String,
    pub etimestamp_ymd: String,
    pub stimestamp_mail_ymd: String,
    pub etimestamp_mail_ymd: String,
    #[serde(skip)]
    pub stimestamp: Option<JsonTime>,
    #[serde(skip)]
    pub etimestamp: Option<JsonTime>,
    #[serde(skip)]
    pub stimestamp_mail: Option<JsonTime>,
    #[serde(skip)]
    pub etimestamp_mail: Option<JsonTime>,
    /// Non-empty raw timestamps that did not parse.
    #[serde(skip)]
    pub rejected_timestamps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopCalendar {
    /// Closed days.
    pub business_holiday: CalendarEvent,
    /// Days open for orders and enquiries only.
    pub shipping_holiday: CalendarEvent,
    /// Days open for shipping only.
    pub shipping_only: CalendarEvent,
    pub shop_holiday: ShopHoliday,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShopCalendarBizModel {
    #[serde(rename = "shopCalendar")]
    pub calendar: ShopCalendar,
}

/// XML envelope of `shopCalendar`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopBizApiResponse {
    pub result_code: String,
    pub result_message_list: Option<ResultMessageList>,
    #[serde(rename = "shopCalendarBizModel")]
    pub result: Option<ShopCalendarBizModel>,
}

impl Envelope for ShopBizApiResponse {
    type Message = CalendarResultMessage;

    fn messages(&self) -> &[CalendarResultMessage] {
        self.result_message_list.as_ref().map(|l| l.list.as_slice()).unwrap_or_default()
    }

    fn has_message_list(&self) -> bool {
        self.result_message_list.is_some()
    }

    fn after_decode(&mut self) {
        post_process_calendar(self);
    }
}

fn process_event(event: &mut CalendarEvent) {
    event.event_dates.clear();
    event.rejected_event_dates.clear();
    for raw in &event.event_date_strs {
        match decode_compact_date(raw) {
            Ok(date) => event.event_dates.push(date),
            Err(err) => {
                tracing::debug!(%err, "calendar event date skipped");
                event.rejected_event_dates.push(raw.clone());
            }
        }
    }
}

fn parse_timestamp(raw: &str, rejected: &mut Vec<String>) -> Option<JsonTime> {
    if raw.is_empty() {
        return None;
    }
    match decode_datetime(raw) {
        Ok(value) => Some(JsonTime::new(value)),
        Err(err) => {
            tracing::debug!(%err, "announcement timestamp skipped");
            rejected.push(raw.to_string());
            None
        }
    }
}

fn process_holiday(holiday: &mut ShopHoliday) {
    let mut rejected = Vec::new();
    holiday.stimestamp = parse_timestamp(&holiday.stimestamp_ymd, &mut rejected);
    holiday.etimestamp = parse_timestamp(&holiday.etimestamp_ymd, &mut rejected);
    holiday.stimestamp_mail = parse_timestamp(&holiday.stimestamp_mail_ymd, &mut rejected);
    holiday.etimestamp_mail = parse_timestamp(&holiday.etimestamp_mail_ymd, &mut rejected);
    holiday.rejected_timestamps = rejected;
}

/// Derive typed dates from the raw strings of a decoded calendar response.
/// Running it twice yields the same result.
pub fn post_process_calendar(response: &mut ShopBizApiResponse) {
    let Some(model) = response.result.as_mut() else {
        return;
    };
    let calendar = &mut model.calendar;
    process_event(&mut calendar.business_holiday);
    process_event(&mut calendar.shipping_holiday);
    process_event(&mut calendar.shipping_only);
    process_holiday(&mut calendar.shop_holiday);
}

/// Structural XML decode followed by the date pass.
pub fn decode_shop_calendar(xml: &str) -> Result<ShopBizApiResponse, ApiError> {
    decode_body(WireFormat::Xml, xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
  <resultCode>N000</resultCode>
  <resultMessageList>
    <resultMessage><code>N000</code><message>Succeeded.</message></resultMessage>
  </resultMessageList>
  <shopCalendarBizModel>
    <shopCalendar>
      <businessHoliday>
        <regularSchedule><regularSchedule>SUN</regularSchedule><regularSchedule>SAT</regularSchedule></regularSchedule>
        <eventDates><eventDates>20200515</eventDates><eventDates>20209999</eventDates><eventDates>20200516</eventDates></eventDates>
      </businessHoliday>
      <shippingHoliday>
        <eventDates><eventDates>20200505</eventDates></eventDates>
      </shippingHoliday>
      <shippingOnly/>
      <shopHoliday>
        <title>GW</title>
        <stimestampYmd>2020-04-29T00:00:00+0900</stimestampYmd>
        <etimestampYmd>2020-05-06T23:59:59+0900</etimestampYmd>
        <stimestampMailYmd>bogus</stimestampMailYmd>
        <mailMessage>Closed for Golden Week</mailMessage>
      </shopHoliday>
    </shopCalendar>
  </shopCalendarBizModel>
</result>"#;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_event_date_is_decoded() {
        let xml = "<result><resultCode>N000</resultCode><shopCalendarBizModel><shopCalendar><businessHoliday>\
                   <eventDates><eventDates>20200515</eventDates></eventDates>\
                   </businessHoliday></shopCalendar></shopCalendarBizModel></result>";
        let resp = decode_shop_calendar(xml).unwrap();
        let event = &resp.result.unwrap().calendar.business_holiday;
        assert_eq!(event.event_dates, vec![ymd(2020, 5, 15)]);
        assert_eq!(event.event_date_strs, vec!["20200515".to_string()]);
    }

    #[test]
    fn bad_entries_do_not_abort_the_list() {
        let resp = decode_shop_calendar(SAMPLE).unwrap();
        let calendar = resp.result.unwrap().calendar;
        let holiday = &calendar.business_holiday;
        assert_eq!(holiday.event_dates, vec![ymd(2020, 5, 15), ymd(2020, 5, 16)]);
        assert_eq!(holiday.rejected_event_dates, vec!["20209999".to_string()]);
        assert_eq!(holiday.event_date_strs.len(), 3);
        assert_eq!(holiday.regular_schedule, vec!["SUN".to_string(), "SAT".to_string()]);
        assert_eq!(calendar.shipping_holiday.event_dates, vec![ymd(2020, 5, 5)]);
        assert!(calendar.shipping_only.event_dates.is_empty());
    }

    #[test]
    fn announcement_timestamps_only_when_present() {
        let resp = decode_shop_calendar(SAMPLE).unwrap();
        let holiday = resp.result.unwrap().calendar.shop_holiday;
        assert_eq!(holiday.title, "GW");
        assert_eq!(holiday.stimestamp.unwrap().to_string(), "2020-04-29T00:00:00+0900");
        assert_eq!(holiday.etimestamp.unwrap().to_string(), "2020-05-06T23:59:59+0900");
        assert!(holiday.stimestamp_mail.is_none());
        assert!(holiday.etimestamp_mail.is_none());
        assert_eq!(holiday.rejected_timestamps, vec!["bogus".to_string()]);
    }

    #[test]
    fn result_messages_are_the_envelope() {
        let resp = decode_shop_calendar(SAMPLE).unwrap();
        assert_eq!(resp.result_code, "N000");
        let leading = resp.leading_message().unwrap();
        assert!(leading.is_success());
        assert_eq!(leading.kind(), "INFO");
        assert!(resp.ensure_leading_success().is_ok());
    }

    #[test]
    fn error_response_without_model() {
        let xml = "<result><resultCode>C001</resultCode><resultMessageList><resultMessage>\
                   <code>C001</code><message>Request parameter is invalid.</message><fieldId>period</fieldId>\
                   </resultMessage></resultMessageList></result>";
        let resp = decode_shop_calendar(xml).unwrap();
        assert!(resp.result.is_none());
        let err = resp.ensure_leading_success().unwrap_err();
        assert!(matches!(err, ApiError::Rejected { ref code, .. } if code == "C001"));
        assert_eq!(resp.messages()[0].field_id.as_deref(), Some("period"));
    }

    #[test]
    fn post_processing_is_idempotent() {
        let mut resp = decode_shop_calendar(SAMPLE).unwrap();
        let once = resp.clone();
        post_process_calendar(&mut resp);
        assert_eq!(resp, once);
    }
}
