use std::sync::Arc;

use color_eyre::eyre::Result;

use crate::{
    amount::{Amount, NonNegative},
    transaction::Transaction,
    transparent::{self, Script},
};

use super::*;

#[test]
fn height_arithmetic() -> Result<()> {
    dvt_test::init();

    assert_eq!(Height(200) - Height(100), 100);
    assert_eq!(Height(100) - Height(200), -100);

    assert_eq!(Height(100) + 1, Some(Height(101)));
    assert_eq!(Height(100) - 101, None);
    assert_eq!(Height::MAX + 1, None);
    assert_eq!(Height(7).next(), Height(8));

    assert!("500000000".parse::<Height>().is_err());
    assert_eq!("42".parse::<Height>()?, Height(42));

    Ok(())
}

#[test]
fn coinbase_accessors() -> Result<()> {
    dvt_test::init();

    let output = transparent::Output {
        value: Amount::<NonNegative>::new_from_coins(1),
        lock_script: Script::new(&[0x51]),
    };
    let coinbase = Transaction::new_coinbase(Height(12), vec![output.clone()]);
    let block = Block::from(vec![Arc::new(coinbase)]);

    assert_eq!(block.coinbase_height(), Some(Height(12)));
    assert_eq!(block.coinbase().map(|tx| tx.outputs.len()), Some(1));

    let empty = Block::from(Vec::new());
    assert_eq!(empty.coinbase_height(), None);
    assert!(empty.coinbase().is_none());

    Ok(())
}
