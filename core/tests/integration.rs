//! End-to-end scenarios against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port (fresh seeded
//! state), then drives `RmsApi` over real HTTP through `UreqTransport`.

use chrono::{NaiveDate, NaiveDateTime};
use rms_core::{
    ApiError, BasketCondition, JsonDate, RmsApi, RmsClient, SearchDateType, SearchOrderCondition,
    ShippingModelCondition, ShopCalendarCondition, UpdateOrderMemoCondition, UreqTransport,
};

const FIRST: &str = "338531-20200501-00000001";
const SECOND: &str = "338531-20200501-00000002";
const THIRD: &str = "338531-20200501-00000003";

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn api(base_url: &str) -> RmsApi<UreqTransport> {
    let client = RmsClient::new(base_url)
        .initialize(mock_server::SERVICE_SECRET, mock_server::LICENSE_KEY)
        .unwrap();
    RmsApi::new(client, UreqTransport::new())
}

fn may(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 5, day)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn search_all(api: &RmsApi<UreqTransport>, cond: Option<&SearchOrderCondition>) -> Vec<String> {
    api.search_order(SearchDateType::OrderDate, may(1, 0, 0, 0), may(31, 23, 59, 59), cond)
        .unwrap()
        .order_number_list
}

#[test]
fn uninitialized_client_fails_before_network() {
    // Nothing listens on port 9; an attempted request would be a transport error.
    let api = RmsApi::new(RmsClient::new("http://127.0.0.1:9"), UreqTransport::new());
    let err = api.get_order(&[FIRST.to_string()], 3).unwrap_err();
    assert!(matches!(err, ApiError::Uninitialized));
    assert_eq!(err.to_string(), "Uninitialized");
}

#[test]
fn bad_credential_is_empty_message_list() {
    let base = start_server();
    let client = RmsClient::new(&base).initialize("wrong", "credential").unwrap();
    let api = RmsApi::new(client, UreqTransport::new());

    let err = api
        .search_order(SearchDateType::OrderDate, may(1, 0, 0, 0), may(31, 0, 0, 0), None)
        .unwrap_err();
    assert!(matches!(err, ApiError::EmptyMessageList));

    let err = api.get_shop_calendar(None).unwrap_err();
    assert!(matches!(err, ApiError::EmptyMessageList));
}

#[test]
fn search_order_scenarios() {
    let base = start_server();
    let api = api(&base);

    let resp = api
        .search_order(SearchDateType::OrderDate, may(1, 0, 0, 0), may(31, 23, 59, 59), None)
        .unwrap();
    assert_eq!(resp.message_model_list[0].message_type, "INFO");
    assert_eq!(resp.order_number_list, vec![FIRST, SECOND, THIRD]);
    assert_eq!(resp.pagination.as_ref().unwrap().total_records_amount, 3);

    let two = SearchOrderCondition {
        request_records_amount: Some(2),
        ..Default::default()
    };
    assert_eq!(search_all(&api, Some(&two)).len(), 2);

    // Out-of-range amount is dropped and the server default applies.
    let too_many = SearchOrderCondition {
        request_records_amount: Some(5000),
        ..Default::default()
    };
    assert_eq!(search_all(&api, Some(&too_many)).len(), 3);

    // Unknown settlement method is dropped rather than sent.
    let bogus = SearchOrderCondition {
        settlement_method: Some(8),
        ..Default::default()
    };
    assert_eq!(search_all(&api, Some(&bogus)).len(), 3);

    let cod = SearchOrderCondition {
        settlement_method: Some(2),
        ..Default::default()
    };
    assert_eq!(search_all(&api, Some(&cod)), vec![SECOND]);

    let newest_first = SearchOrderCondition {
        sort_direction: Some(2),
        ..Default::default()
    };
    assert_eq!(search_all(&api, Some(&newest_first))[0], THIRD);

    let narrow = api
        .search_order(SearchDateType::OrderDate, may(2, 0, 0, 0), may(2, 23, 59, 59), None)
        .unwrap();
    assert_eq!(narrow.order_number_list, vec![SECOND]);
}

#[test]
fn search_by_order_fix_date_week_window() {
    let base = start_server();
    let api = api(&base);

    // Fixed seven days before to one day after the reference time.
    let now = may(8, 12, 0, 0);
    let resp = api
        .search_order(
            SearchDateType::OrderFixDate,
            now - chrono::Duration::days(7),
            now + chrono::Duration::days(1),
            None,
        )
        .unwrap();
    assert_eq!(resp.message_model_list[0].message_type, "INFO");
    assert_eq!(resp.order_number_list, vec![FIRST, SECOND, THIRD]);
    assert_eq!(resp.pagination.as_ref().unwrap().request_page, 1);
}

#[test]
fn get_order_scenarios() {
    let base = start_server();
    let api = api(&base);

    let empty = api.get_order(&[], 3).unwrap();
    assert_eq!(empty.message_model_list[0].message_type, "ERROR");
    assert!(empty.order_model_list.is_empty());

    let resp = api.get_order(&[THIRD.to_string()], 3).unwrap();
    assert_eq!(resp.message_model_list[0].message_type, "INFO");
    let order = &resp.order_model_list[0];
    assert_eq!(order.order_number, THIRD);
    assert_eq!(order.order_progress, 500);
    assert_eq!(order.order_datetime.unwrap().naive(), may(3, 9, 15, 0));
    let shipping = &order.packages[0].shippings[0];
    assert_eq!(shipping.delivery_company.as_deref(), Some("1001"));
    assert_eq!(
        shipping.shipping_date.unwrap().naive(),
        NaiveDate::from_ymd_opt(2020, 5, 4).unwrap()
    );
}

#[test]
fn update_order_memo_round_trip() {
    let base = start_server();
    let api = api(&base);

    let cond = UpdateOrderMemoCondition {
        memo: Some("ギフト包装".to_string()),
        operator: Some("yamada".to_string()),
        shipping_term: Some(1418),
        delivery_date: Some(JsonDate::new(NaiveDate::from_ymd_opt(2020, 5, 20).unwrap())),
        delivery_class: Some(99),
        ..Default::default()
    };
    let resp = api.update_order_memo(FIRST, &cond).unwrap();
    assert_eq!(resp.message_model_list[0].message_type, "INFO");

    let fetched = api.get_order(&[FIRST.to_string()], 3).unwrap();
    let order = &fetched.order_model_list[0];
    assert_eq!(order.memo.as_deref(), Some("ギフト包装"));
    assert_eq!(order.operator.as_deref(), Some("yamada"));
    assert_eq!(order.shipping_term, Some(1418));
    assert_eq!(order.delivery_date.unwrap().to_string(), "2020-05-20");
    // Disallowed delivery class never reached the server.
    assert_eq!(order.delivery.delivery_class, None);

    let err = api.update_order_memo("338531-20200501-99999999", &cond).unwrap_err();
    match err {
        ApiError::Rejected { message_type, code, .. } => {
            assert_eq!(message_type, "ERROR");
            assert_eq!(code, "ORDER_EXT_API_UPDATE_ORDERMEMO_ERROR_007");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn update_order_shipping_round_trip() {
    let base = start_server();
    let api = api(&base);

    let baskets = [BasketCondition {
        basket_id: 10002,
        shipping_models: vec![ShippingModelCondition {
            delivery_company: Some("1002".to_string()),
            shipping_number: Some("4455-6677-8899".to_string()),
            shipping_date: Some(JsonDate::new(NaiveDate::from_ymd_opt(2020, 5, 7).unwrap())),
            ..Default::default()
        }],
    }];
    api.update_order_shipping(SECOND, &baskets).unwrap();

    let fetched = api.get_order(&[SECOND.to_string()], 3).unwrap();
    let order = &fetched.order_model_list[0];
    let shipping = &order.packages[0].shippings[0];
    assert_eq!(shipping.shipping_detail_id, 1);
    assert_eq!(shipping.delivery_company.as_deref(), Some("1002"));
    assert_eq!(shipping.shipping_number.as_deref(), Some("4455-6677-8899"));

    let unknown_basket = [BasketCondition {
        basket_id: 1,
        shipping_models: Vec::new(),
    }];
    let err = api.update_order_shipping(SECOND, &unknown_basket).unwrap_err();
    assert!(err.is_semantic());
}

#[test]
fn shop_calendar_scenario() {
    let base = start_server();
    let api = api(&base);

    let cond = ShopCalendarCondition {
        from_date: Some("2020-05-01".to_string()),
        period: Some(30),
    };
    let resp = api.get_shop_calendar(Some(&cond)).unwrap();
    assert_eq!(resp.result_code, "N000");

    let calendar = resp.result.unwrap().calendar;
    assert_eq!(
        calendar.business_holiday.event_dates,
        vec![NaiveDate::from_ymd_opt(2020, 5, 15).unwrap()]
    );
    assert_eq!(calendar.business_holiday.regular_schedule, vec!["SUN", "SAT"]);
    assert_eq!(calendar.shipping_holiday.event_dates.len(), 2);
    assert!(calendar.shipping_only.event_dates.is_empty());
    assert_eq!(
        calendar.shop_holiday.stimestamp.unwrap().naive(),
        may(1, 0, 0, 0)
    );

    // An out-of-range period is dropped, so the server default applies.
    let wide = ShopCalendarCondition {
        from_date: None,
        period: Some(365),
    };
    assert!(api.get_shop_calendar(Some(&wide)).is_ok());
}
