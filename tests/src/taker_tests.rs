use super::*;
use ckb_types::packed::WitnessArgs;
use dex_sdk::aggregator::{ConnectData, JoyIdConfig, KeyType};
use dex_sdk::collector::{serialize_out_point, Collector};
use dex_sdk::order::{build_taker_tx, Asset, BaseParams, TakerParams};

const FEE: u64 = 1000;

fn taker_params(order_out_points: Vec<OutPoint>, asset: Asset) -> TakerParams<'static> {
    TakerParams {
        base: BaseParams {
            fee: Some(FEE),
            asset,
            ..Default::default()
        },
        buyer: BUYER_ADDRESS,
        order_out_points,
    }
}

fn udt_order(owner: &Script, total_value_ckb: u128, amount: u128) -> OrderCell {
    OrderCell::builder()
        .capacity_dec(215, 8) // 215 ckb
        .owner(owner)
        .setup(0)
        .total_value_dec(total_value_ckb, 8)
        .asset_type(&XUDT_TYPE)
        .udt_amount(amount)
        .build()
}

fn buyer_source(free_ckb: u64) -> MemoryCellSource {
    let mut source = MemoryCellSource::new();
    source.add_free(&BUYER_LOCK, FreeCell::new_with_dec(free_ckb, 8));
    source
}

#[tokio::test]
async fn test_udt_taker() {
    init_logger();
    let mut source = buyer_source(5000);
    let order = source.add_order(udt_order(&SELLER_LOCK, 2000, 600));
    let mut collector = Collector::new(source);

    let result = build_taker_tx(&mut collector, &taker_params(vec![order.clone()], Asset::Xudt))
        .await
        .unwrap();
    let tx = &result.tx;

    assert_eq!(result.tx_fee, FEE);
    assert_eq!(result.witness_index, 1);

    let inputs: Vec<OutPoint> = tx.input_pts_iter().collect();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0].as_slice(), order.as_slice());

    assert_eq!(tx.outputs().len(), 3);
    // price plus the order cell capacity goes to the seller
    let payment = tx.output(0).unwrap();
    assert!(script_eq(&payment.lock(), &SELLER_LOCK));
    assert!(payment.type_().is_none());
    assert_eq!(output_capacity(tx, 0), 2215 * CKB);

    let tokens = tx.output(1).unwrap();
    assert!(script_eq(&tokens.lock(), &BUYER_LOCK));
    assert!(script_eq(&tokens.type_().to_opt().unwrap(), &XUDT_TYPE));
    assert_eq!(output_capacity(tx, 1), 145 * CKB);
    assert_eq!(udt_amount(&output_data(tx, 1)), 600);

    assert!(script_eq(&tx.output(2).unwrap().lock(), &BUYER_LOCK));
    assert_eq!(output_capacity(tx, 2), (5000 + 215 - 2215 - 145) * CKB - FEE);
    assert_eq!(
        collector.source().inputs_capacity(tx),
        outputs_capacity(tx) + result.tx_fee
    );

    let config = NetworkConfig::testnet();
    assert_eq!(tx.cell_deps().len(), 2);
    assert_eq!(
        tx.cell_deps().get(0).unwrap().as_slice(),
        config.xudt_type.cell_dep.cell_dep().as_slice()
    );
    assert_eq!(
        tx.cell_deps().get(1).unwrap().as_slice(),
        config.dex_lock.cell_dep.cell_dep().as_slice()
    );

    assert_eq!(tx.witnesses().len(), 2);
    assert!(witness(tx, 0).is_empty());
    assert_eq!(witness(tx, 1), WitnessArgs::new_builder().build().as_bytes());
    assert!(collector.is_in_queue(&order));
}

#[tokio::test]
async fn test_udt_taker_merges_tokens() {
    let secp = dex_sdk::address::address_to_script(SECP_SHORT_ADDRESS).unwrap();
    let mut source = buyer_source(5000);
    let first = source.add_order(udt_order(&SELLER_LOCK, 2000, 600));
    let second = source.add_order(udt_order(&secp, 1000, 400));
    let mut collector = Collector::new(source);

    let result = build_taker_tx(&mut collector, &taker_params(vec![first, second], Asset::Xudt))
        .await
        .unwrap();
    let tx = &result.tx;

    assert_eq!(result.witness_index, 2);
    assert_eq!(tx.outputs().len(), 4);
    assert!(script_eq(&tx.output(0).unwrap().lock(), &SELLER_LOCK));
    assert_eq!(output_capacity(tx, 0), 2215 * CKB);
    assert!(script_eq(&tx.output(1).unwrap().lock(), &secp));
    assert_eq!(output_capacity(tx, 1), 1215 * CKB);
    // one token cell for both orders
    assert_eq!(udt_amount(&output_data(tx, 2)), 1000);
    assert_eq!(
        collector.source().inputs_capacity(tx),
        outputs_capacity(tx) + result.tx_fee
    );
}

#[tokio::test]
async fn test_udt_taker_keeps_types_apart() {
    let mut source = buyer_source(5000);
    let first = source.add_order(udt_order(&SELLER_LOCK, 100, 600));
    let other = OrderCell::builder()
        .capacity_dec(215, 8)
        .owner(&SELLER_LOCK)
        .total_value_dec(100, 8)
        .asset_type(&OTHER_XUDT_TYPE)
        .udt_amount(50)
        .build();
    let second = source.add_order(other);
    let third = source.add_order(udt_order(&SELLER_LOCK, 100, 1));
    let mut collector = Collector::new(source);

    let result = build_taker_tx(&mut collector, &taker_params(vec![first, second, third], Asset::Xudt))
        .await
        .unwrap();
    let tx = &result.tx;

    // three payments, two token cells in first-seen order, change
    assert_eq!(tx.outputs().len(), 6);
    assert!(script_eq(&tx.output(3).unwrap().type_().to_opt().unwrap(), &XUDT_TYPE));
    assert_eq!(udt_amount(&output_data(tx, 3)), 601);
    assert!(script_eq(&tx.output(4).unwrap().type_().to_opt().unwrap(), &OTHER_XUDT_TYPE));
    assert_eq!(udt_amount(&output_data(tx, 4)), 50);
}

#[tokio::test]
async fn test_spore_taker() {
    let mut source = buyer_source(5000);
    let spore = SporeCell::new_with_dec(179, 8, 9, 50);
    let order_cell = OrderCell::builder()
        .capacity_dec(249, 8)
        .owner(&SELLER_LOCK)
        .setup(4)
        .total_value_dec(300, 8)
        .asset_type(&spore.type_script())
        .data(spore.content.clone())
        .build();
    let order_lock = order_cell.lock.clone();
    let order = source.add_order(order_cell);
    let mut collector = Collector::new(source);

    let result = build_taker_tx(&mut collector, &taker_params(vec![order], Asset::Spore))
        .await
        .unwrap();
    let tx = &result.tx;

    assert_eq!(tx.outputs().len(), 3);
    // the price already covers the order cell
    assert_eq!(output_capacity(tx, 0), 300 * CKB);
    let nft = tx.output(1).unwrap();
    assert!(script_eq(&nft.lock(), &BUYER_LOCK));
    assert!(script_eq(&nft.type_().to_opt().unwrap(), &spore.type_script()));
    assert_eq!(output_capacity(tx, 1), 179 * CKB);
    assert_eq!(output_data(tx, 1), spore.content);
    assert_eq!(output_capacity(tx, 2), (5000 + 249 - 300 - 179) * CKB - FEE);

    assert_eq!(
        tx.cell_deps().get(0).unwrap().as_slice(),
        NetworkConfig::testnet().spore_type.cell_dep.cell_dep().as_slice()
    );
    assert_eq!(tx.witnesses().len(), 3);
    let cobuild = witness(tx, 2);
    assert_eq!(&cobuild[..4], &[0x01, 0x00, 0x00, 0xff]);
    // transfer from the order lock to the buyer
    let raw = cobuild.to_vec();
    let contains = |needle: &[u8]| raw.windows(needle.len()).any(|window| window == needle);
    assert!(contains(order_lock.as_slice()));
    assert!(contains(BUYER_LOCK.as_slice()));
}

#[tokio::test]
async fn test_taker_estimates_fee_with_joyid() {
    let mut source = buyer_source(5000);
    let order = source.add_order(udt_order(&SELLER_LOCK, 2000, 600));
    let mut collector = Collector::new(source);
    let oracle = MockOracle::new("0x00");
    let connect_data = ConnectData {
        pubkey:   JOYID_PUBKEY.to_owned(),
        key_type: KeyType::MainKey,
    };
    let params = TakerParams {
        base:             BaseParams {
            joyid: Some(JoyIdConfig {
                aggregator:   &oracle,
                connect_data: &connect_data,
            }),
            ..Default::default()
        },
        buyer:            BUYER_ADDRESS,
        order_out_points: vec![order],
    };

    let result = build_taker_tx(&mut collector, &params).await.unwrap();
    let tx = &result.tx;

    assert_eq!(tx.cell_deps().len(), 3);
    assert_eq!(
        tx.cell_deps().get(2).unwrap().as_slice(),
        NetworkConfig::testnet().joyid_lock.cell_dep.cell_dep().as_slice()
    );
    assert!(result.tx_fee > 0 && result.tx_fee < params.base.fee_config.max_fee);
    assert_eq!(
        collector.source().inputs_capacity(tx),
        outputs_capacity(tx) + result.tx_fee
    );
}

#[tokio::test]
async fn test_taker_spent_order() {
    let mut collector = Collector::new(buyer_source(5000));
    let spent = OutPoint::new(share::hash::blake2b_256(b"spent").pack(), 0);

    let err = build_taker_tx(&mut collector, &taker_params(vec![spent.clone()], Asset::Xudt))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Error::LiveCellNotFound(format!("The order cell {} has been spent", serialize_out_point(&spent)))
    );
}

#[tokio::test]
async fn test_taker_rejects_non_order_cell() {
    let mut source = buyer_source(5000);
    let udt = source.add_udt(&SELLER_LOCK, &XUDT_TYPE, UdtCell::new_with_dec(145, 8, 10, 0));
    let mut collector = Collector::new(source);

    let err = build_taker_tx(&mut collector, &taker_params(vec![udt.clone()], Asset::Xudt))
        .await
        .unwrap_err();
    assert_eq!(err, Error::NotOrderCell(serialize_out_point(&udt)));
}

#[tokio::test]
async fn test_taker_asset_mismatch() {
    let mut source = buyer_source(5000);
    let order = source.add_order(udt_order(&SELLER_LOCK, 2000, 600));
    let mut collector = Collector::new(source);

    let err = build_taker_tx(&mut collector, &taker_params(vec![order], Asset::Spore))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedAsset(_)));
}

#[tokio::test]
async fn test_taker_order_without_type() {
    let mut source = buyer_source(5000);
    let order = source.add_order(
        OrderCell::builder()
            .capacity_dec(200, 8)
            .owner(&SELLER_LOCK)
            .total_value_dec(100, 8)
            .build(),
    );
    let mut collector = Collector::new(source);

    let err = build_taker_tx(&mut collector, &taker_params(vec![order], Asset::Xudt))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingTypeOrData(_)));
}

#[tokio::test]
async fn test_taker_insufficient_ckb() {
    let mut source = buyer_source(100);
    let order = source.add_order(udt_order(&SELLER_LOCK, 2000, 600));
    let mut collector = Collector::new(source);

    let err = build_taker_tx(&mut collector, &taker_params(vec![order.clone()], Asset::Xudt))
        .await
        .unwrap_err();
    // 2215 + 145 - 215 outputs, 64 change and the fee rounded up
    assert_eq!(
        err,
        Error::InsufficientCapacity("Insufficient free CKB balance, at least 2210 CKB is required".to_owned())
    );
    assert!(!collector.is_in_queue(&order));
}

#[tokio::test]
async fn test_taker_without_empty_cells() {
    let mut source = MemoryCellSource::new();
    let order = source.add_order(udt_order(&SELLER_LOCK, 2000, 600));
    let mut collector = Collector::new(source);

    let err = build_taker_tx(&mut collector, &taker_params(vec![order], Asset::Xudt))
        .await
        .unwrap_err();
    assert_eq!(err, Error::NoFreeCells);
}
