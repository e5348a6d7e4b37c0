//! End-to-end quoting flows: reserve snapshots in, ranked trades and
//! router call parameters out.

use alloy_primitives::{address, Address};
use std::cmp::Ordering;

use swapquote::{
    swap_call_parameters, trade_comparator, BestTradeOptions, CallArg, Currency, CurrencyAmount,
    Deadline, Pair, Percent, Route, Token, Trade, TradeOptions,
};

const FACTORY: Address = address!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f");
const RECIPIENT: Address = address!("0000000000000000000000000000000000000009");

fn token(byte: u8) -> Token {
    Token::new(1, Address::with_last_byte(byte), 18, format!("T{byte}"), format!("Token {byte}"))
}

fn weth() -> Token {
    Token::new(
        1,
        address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        18,
        "WETH",
        "Wrapped Ether",
    )
}

fn pair(a: Token, reserve_a: u64, b: Token, reserve_b: u64) -> Pair {
    Pair::new(
        CurrencyAmount::new(a.into(), reserve_a),
        CurrencyAmount::new(b.into(), reserve_b),
        FACTORY,
    )
    .unwrap()
}

fn market() -> Vec<Pair> {
    vec![
        pair(token(1), 10_000, token(2), 20_000),
        pair(token(2), 15_000, token(3), 15_000),
        pair(token(1), 30_000, token(3), 30_000),
        pair(token(3), 10_000, token(4), 10_000),
        pair(token(1), 5_000, token(4), 5_000),
        pair(token(2), 8_000, token(4), 12_000),
    ]
}

#[test]
fn search_results_are_bounded_sorted_and_simple() {
    let trades = Trade::best_trade_exact_in(
        &market(),
        &CurrencyAmount::new(Currency::Token(token(1)), 1000u32),
        &Currency::Token(token(4)),
        &weth(),
        BestTradeOptions::default(),
    )
    .unwrap();

    assert!(!trades.is_empty());
    assert!(trades.len() <= 3);
    for trade in &trades {
        // hop cap
        assert!(trade.route().pairs().len() <= 3);
        // no pair appears twice in one route
        let mut addresses: Vec<_> = trade
            .route()
            .pairs()
            .iter()
            .map(|p| p.liquidity_token().address)
            .collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), trade.route().pairs().len());
    }
    // best-first ordering holds pairwise
    for window in trades.windows(2) {
        assert_ne!(
            trade_comparator(&window[0], &window[1]).unwrap(),
            Ordering::Greater
        );
    }
}

#[test]
fn comparator_is_transitive_over_ranked_results() {
    let trades = Trade::best_trade_exact_in(
        &market(),
        &CurrencyAmount::new(Currency::Token(token(1)), 1000u32),
        &Currency::Token(token(4)),
        &weth(),
        BestTradeOptions::default(),
    )
    .unwrap();
    assert!(trades.len() >= 3);
    let (a, b, c) = (&trades[0], &trades[1], &trades[2]);
    if trade_comparator(a, b).unwrap() == Ordering::Less
        && trade_comparator(b, c).unwrap() == Ordering::Less
    {
        assert_eq!(trade_comparator(a, c).unwrap(), Ordering::Less);
    }
    // equal-valued trades compare as equal
    assert_eq!(trade_comparator(a, a).unwrap(), Ordering::Equal);
}

#[test]
fn exact_in_and_exact_out_searches_agree_on_the_best_route() {
    let pairs = market();
    let amount_in = CurrencyAmount::new(Currency::Token(token(1)), 1000u32);
    let forward = Trade::best_trade_exact_in(
        &pairs,
        &amount_in,
        &Currency::Token(token(4)),
        &weth(),
        BestTradeOptions::default(),
    )
    .unwrap();
    let best_output = forward[0].output_amount().clone();

    // asking for exactly that output must not require more than we put in
    let backward = Trade::best_trade_exact_out(
        &pairs,
        &Currency::Token(token(1)),
        &best_output,
        &weth(),
        BestTradeOptions::default(),
    )
    .unwrap();
    assert!(!backward.is_empty());
    assert!(backward[0].input_amount().raw() <= amount_in.raw());
}

#[test]
fn native_quote_to_router_call() {
    let pairs = vec![
        pair(weth(), 100_000, token(2), 200_000),
        pair(token(2), 50_000, token(3), 50_000),
    ];
    let trades = Trade::best_trade_exact_in(
        &pairs,
        &CurrencyAmount::native(1, 5_000u32),
        &Currency::Token(token(3)),
        &weth(),
        BestTradeOptions::default(),
    )
    .unwrap();
    let best = &trades[0];
    assert!(best.input_amount().currency().is_native());

    let params = swap_call_parameters(
        best,
        &TradeOptions {
            allowed_slippage: Percent::new(1, 100),
            recipient: RECIPIENT,
            deadline: Deadline::Absolute(1_700_000_000),
            fee_on_transfer: false,
        },
    )
    .unwrap();
    assert_eq!(params.method_name, "swapExactETHForTokens");
    // the attached value is the fixed native input
    assert_eq!(params.value, "0x1388");
    let CallArg::AddressList(path) = &params.args[1] else {
        panic!("second arg should be the token path");
    };
    assert_eq!(path[0], format!("{}", weth().address));
}

#[test]
fn quote_matches_manual_route_evaluation() {
    // the search must agree with evaluating the same route directly
    let pairs = market();
    let trades = Trade::best_trade_exact_in(
        &pairs,
        &CurrencyAmount::new(Currency::Token(token(1)), 1000u32),
        &Currency::Token(token(4)),
        &weth(),
        BestTradeOptions { max_hops: 1, ..Default::default() },
    )
    .unwrap();
    let direct = &trades[0];

    let route = Route::new(
        vec![pair(token(1), 5_000, token(4), 5_000)],
        &weth(),
        token(1).into(),
        Some(token(4).into()),
    )
    .unwrap();
    let manual = Trade::exact_in(
        route,
        CurrencyAmount::new(Currency::Token(token(1)), 1000u32),
        &weth(),
    )
    .unwrap();
    assert_eq!(direct.output_amount(), manual.output_amount());
    assert_eq!(direct.execution_price().value(), manual.execution_price().value());
}

#[test]
fn reserve_snapshots_round_trip_as_data() {
    let snapshot = serde_json::to_string(&token(7)).unwrap();
    let restored: Token = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(restored, token(7));
    assert_eq!(restored.decimals, 18);

    let native = Currency::Native { chain_id: 1 };
    let restored: Currency = serde_json::from_str(&serde_json::to_string(&native).unwrap()).unwrap();
    assert_eq!(restored, native);
}
