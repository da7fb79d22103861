//! Fixed test vectors for amounts.

use color_eyre::eyre::Result;

use super::*;

#[test]
fn addition_stays_in_range() -> Result<()> {
    dvt_test::init();

    let one = Amount::<NonNegative>::new(1);
    let max = Amount::<NonNegative>::new(MAX_MONEY);

    assert_eq!((one + one)?, 2);
    assert_eq!((Amount::<NonNegative>::zero() + max)?, MAX_MONEY);
    assert!(matches!(
        max + one,
        Err(Error::Constraint { value, .. }) if value == MAX_MONEY + 1
    ));

    Ok(())
}

#[test]
fn non_negative_rejects_out_of_range_values() -> Result<()> {
    dvt_test::init();

    let neg_one: std::result::Result<Amount<NonNegative>, _> = (-1i64).try_into();
    assert!(matches!(neg_one, Err(Error::Constraint { value: -1, .. })));

    let too_large: std::result::Result<Amount<NonNegative>, _> = (MAX_MONEY + 1).try_into();
    assert!(too_large.is_err());

    let max: Amount<NonNegative> = MAX_MONEY.try_into()?;
    assert_eq!(max, MAX_MONEY);

    let huge: std::result::Result<Amount<NonNegative>, _> = (i128::from(i64::MAX) + 1).try_into();
    assert!(matches!(huge, Err(Error::Convert { .. })));

    Ok(())
}

#[test]
fn whole_coins_rounds_down() -> Result<()> {
    dvt_test::init();

    assert_eq!(Amount::<NonNegative>::new_from_coins(1_000).whole_coins(), 1_000);
    assert_eq!(Amount::<NonNegative>::new(COIN - 1).whole_coins(), 0);
    assert_eq!(Amount::<NonNegative>::new(3 * COIN / 2).whole_coins(), 1);

    Ok(())
}

#[test]
fn division() -> Result<()> {
    dvt_test::init();

    let ten = Amount::<NonNegative>::new(10);

    assert_eq!((ten / 3)?, 3);
    assert_eq!((ten / 20)?, 0);
    assert!(matches!(ten / 0, Err(Error::DivideByZero { amount: 10 })));

    Ok(())
}

#[test]
fn ordering_follows_satoshis() -> Result<()> {
    dvt_test::init();

    let one: Amount<NonNegative> = 1i64.try_into()?;

    assert!(Amount::<NonNegative>::zero() < one);
    assert_eq!(one.max(Amount::<NonNegative>::new(5)), 5);

    Ok(())
}

#[test]
fn bytes_are_little_endian_and_checked() -> Result<()> {
    dvt_test::init();

    let amount = Amount::<NonNegative>::new(0x0102);
    assert_eq!(amount.to_bytes(), [0x02, 0x01, 0, 0, 0, 0, 0, 0]);
    assert_eq!(amount.dvt_serialize_to_vec()?, amount.to_bytes().to_vec());

    let big_bytes = (MAX_MONEY + 1).to_le_bytes();
    assert!(Amount::<NonNegative>::from_bytes(big_bytes).is_err());

    let ok_bytes = 5_i64.to_le_bytes();
    assert_eq!(Amount::<NonNegative>::from_bytes(ok_bytes)?, 5);

    Ok(())
}
