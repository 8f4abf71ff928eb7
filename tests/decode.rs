use txdecode::{ByteCursor, DecodeError, DecodeOptions, decode, decode_bytes};

const SAMPLE_TX: &str = "0200000000010131811cd355c357e0e01437d9bcf690df824e9ff785012b6115dfae3d8e8b36c10100000000fdffffff0220a107000000000016001485d78eb795bd9c8a21afefc8b6fdaedf718368094c08100000000000160014840ab165c9c2555d4a31b9208ad806f89d2535e20247304402207bce86d430b58bb6b79e8c1bbecdf67a530eff3bc61581a1399e0b28a741c0ee0220303d5ce926c60bf15577f2e407f28a2ef8fe8453abd4048b716e97dbb1e3a85c01210260828bc77486a55e3bc6032ccbeda915d9494eda17b4a54dbe3b24506d40e4ff43030e00";

// Two P2SH-P2WSH multisig inputs, three outputs
const MULTI_INPUT_SEGWIT_TX: &str = "010000000001026c4224e4d6bab0cfdfd67870e084cda34e42d3544b3c77d310df40831fa4f5061700000023220020fb24ee0fec024ff3ff03c44d16ca523b78fd33ebaab99176e98b3f5e0e78da9dffffffffe8faf73aee5a09b1b678277fc63150dff639c97521e9088d6721a2b995f33664010000002322002083e1adc1eb82945fa99500bcd9df963b0e731524fd8eb25ef205e88d3bd7ab77ffffffff03a0370a00000000001976a914b00ff32bbc990acde3e5ac022e6d4120fb168f1e88ac7f791300000000001976a914128afed7e8d4e6f3a9d2d38ad560c307ebf392ba88ac54115c00000000001976a914c65d16caa1d8c1c46cc1bfac92eff06b02d8afcc88ac04004830450221009d93dc766b4a3417d7daccffe39719cd0344779c19d589d3a078625139a7dcd50220267c1b9b365d0eaa3b036771cbfc994c2b1c5b29e5107f023f036360cb60c8b50147304402206346b5c2bfa243c9cd0c5056abedfadc79e4a2b67b918315fc3faf79dfd12d7602203f729a665afd02ceb4b07898c06c81f0dfc378f66409ed828a4b5fe84f9287550169522102b951c91d97118489d1980ec472d89b5bc98fb98d0bafa17aca238d18a758b8642103d45b78e2a683330c62878e44610a5d1c8d40bd1f261b1110940b1b8a5aecd3e82103796ecd1667be6e20af571c46517e4ecf5e83052df864266658dd7f88e63efa6153ae0400483045022100e396deff2fe6dd6081e35f9dced6e09ea1b8b4830ae322b5d58986596996893d0220485420653c118c1a13b48941166b242077530d2b3cab908abe67af6b96ef2850014730440220171e11f4d6a106464a94e29f46750803a7deb214e6fbe2140ec5d80577dded0e02203483ab0c685f66e17b4afa86ba053732b43ff1ca7654796e72b69bd224bf26c4016952210375e42f77749f92a6b54c8e85fab2209e6807e15a3768c024a5cab01dc301c0282103fd4969521bd2d0f8e147c16655ae9c29dc48cb4f124b7a6398db78b1cbc878a221036bc18f387d1e4ba80492854cee639bd4ab6e3a310d9faa6f17350bbdc4c029d053ae25680a00";

const LEGACY_TX: &str = "0100000001813f79011acb80925dfe69b3def355fe914bd1d96a3f5f71bf8303c6a989c7d1000000006b483045022100ed81ff192e75a3fd2304004dcadb746fa5e24c5031ccfcf21320b0277457c98f02207a986d955c6e0cb35d446a89d3f56100f4d7f67801c31967743a9c8e10615bed01210349fc4e631e3624a545de3f89f5d8684c7b8138bd94bdd531d2e213bf016b278afeffffff02a135ef01000000001976a914bc3b654dca7e56b04dca18f2566cdaf02e8d9ada88ac99c39800000000001976a9141c4bc762dd5423e332166702cb75f40df79fea1288ac19430600";

#[test]
fn sample_transaction() {
    let tx = decode(SAMPLE_TX).unwrap();

    assert_eq!(tx.version, 2);
    assert!(tx.segwit);

    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(tx.inputs[0].prev_index, 1);
    assert_eq!(tx.inputs[0].sequence, 0xfffffffd);

    assert_eq!(tx.outputs.len(), 2);
    assert_eq!(tx.outputs[0].value, 500_000);
    assert_eq!(tx.outputs[1].value, 1_050_700);
    assert!((tx.outputs[0].btc() - 0.005).abs() < 1e-12);
    assert!((tx.outputs[1].btc() - 0.010507).abs() < 1e-12);

    assert_eq!(tx.witnesses.len(), 1);
    assert_eq!(tx.witnesses[0].len(), 2);
    assert_eq!(tx.witnesses[0].0[0].len(), 0x47);

    assert_eq!(tx.locktime, 0x000e0343);
}

#[test]
fn multi_input_witnesses_stay_aligned() {
    let tx = decode(MULTI_INPUT_SEGWIT_TX).unwrap();

    assert_eq!(tx.version, 1);
    assert!(tx.segwit);
    assert_eq!(tx.inputs.len(), 2);
    assert_eq!(tx.witnesses.len(), tx.inputs.len());

    // 0-length dummy for CHECKMULTISIG, two signatures, witness script
    for witness in &tx.witnesses {
        assert_eq!(witness.len(), 4);
        assert!(witness.0[0].is_empty());
    }

    assert_eq!(tx.outputs.len(), 3);
    assert_eq!(tx.outputs[0].value, 669600);
    assert_eq!(tx.outputs[1].value, 1276287);
    assert_eq!(tx.outputs[2].value, 6033748);

    assert_eq!(
        tx.txid(),
        "3ecf9b3d965cfaa2c472f09b5f487fbd838e4e1f861e3542c541d39c5cb7bc25"
    );
    assert_ne!(tx.txid(), tx.wtxid());
}

#[test]
fn legacy_has_no_witnesses() {
    let tx = decode(LEGACY_TX).unwrap();
    assert!(!tx.segwit);
    assert!(tx.witnesses.is_empty());
    assert_eq!(tx.inputs.len(), 1);
}

#[test]
fn little_endian_fields() {
    let mut cursor = ByteCursor::new(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(cursor.read_u32_le().unwrap(), 1);
    assert_eq!(cursor.read_u32_le().unwrap(), 0);
}

#[test]
fn txid_is_displayed_reversed() {
    let wire: Vec<u8> = (0u8..32).collect();

    let mut raw = vec![0x01, 0x00, 0x00, 0x00, 0x01];
    raw.extend_from_slice(&wire);
    raw.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // vout
    raw.push(0x00); // empty scriptSig
    raw.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
    raw.push(0x00); // no outputs
    raw.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let tx = decode_bytes(&raw, &DecodeOptions::default()).unwrap();

    let mut reversed = wire.clone();
    reversed.reverse();
    assert_eq!(hex::encode(tx.inputs[0].prev_tx), hex::encode(reversed));
}

#[test]
fn every_prefix_is_truncated() {
    for full in [SAMPLE_TX, LEGACY_TX, MULTI_INPUT_SEGWIT_TX] {
        let raw = hex::decode(full).unwrap();
        for len in 0..raw.len() {
            let err = decode_bytes(&raw[..len], &DecodeOptions::default()).unwrap_err();
            assert!(
                matches!(err, DecodeError::TruncatedInput { .. }),
                "prefix of {len} bytes gave {err:?}"
            );
        }
    }
}

#[test]
fn marker_without_flag_reparsed_as_input_count() {
    // Version, then 0x00 0x00: zero inputs and zero outputs, not a segwit marker
    let tx = decode("020000000000ffffffff").unwrap();
    assert!(!tx.segwit);
    assert!(tx.inputs.is_empty());
    assert!(tx.outputs.is_empty());
    assert_eq!(tx.locktime, 0xffffffff);
}

#[test]
fn malformed_hex_rejected_before_parsing() {
    let odd = &SAMPLE_TX[..SAMPLE_TX.len() - 1];
    assert!(matches!(decode(odd), Err(DecodeError::MalformedHex(_))));
    assert!(matches!(decode("not hex"), Err(DecodeError::MalformedHex(_))));
}

#[test]
fn strict_options_accept_canonical_transactions() {
    for tx in [SAMPLE_TX, LEGACY_TX, MULTI_INPUT_SEGWIT_TX] {
        assert!(txdecode::decode_with(tx, &DecodeOptions::strict()).is_ok());
    }
}
