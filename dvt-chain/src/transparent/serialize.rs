//! Consensus serialization of transparent inputs and outputs.

use std::io;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{
    block,
    serialization::{DvtSerialize, WriteDvtExt},
    transaction,
};

use super::{CoinbaseData, Input, OutPoint, Output};

impl DvtSerialize for OutPoint {
    fn dvt_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        writer.write_32_bytes(&self.hash.0)?;
        writer.write_u32::<LittleEndian>(self.index)?;
        Ok(())
    }
}

/// Write the coinbase height as a minimal script push, as Bitcoin does for BIP-34.
///
/// The Bitcoin encoding requires that the most significant byte is below 0x80,
/// so the ranges run up to 2^{n-1} rather than 2^n.
fn write_coinbase_height<W: io::Write>(height: block::Height, mut w: W) -> Result<(), io::Error> {
    match height.0 {
        // Genesis block does not include height.
        0 => {}
        h @ 1..=16 => w.write_u8(0x50 + (h as u8))?,
        h @ 17..=127 => {
            w.write_u8(0x01)?;
            w.write_u8(h as u8)?;
        }
        h @ 128..=32767 => {
            w.write_u8(0x02)?;
            w.write_u16::<LittleEndian>(h as u16)?;
        }
        h @ 32768..=8_388_607 => {
            w.write_u8(0x03)?;
            w.write_u8(h as u8)?;
            w.write_u8((h >> 8) as u8)?;
            w.write_u8((h >> 16) as u8)?;
        }
        h => {
            w.write_u8(0x04)?;
            w.write_u32::<LittleEndian>(h)?;
        }
    }

    Ok(())
}

fn coinbase_height_len(height: block::Height) -> usize {
    match height.0 {
        0 => 0,
        1..=16 => 1,
        17..=127 => 2,
        128..=32767 => 3,
        32768..=8_388_607 => 4,
        _ => 5,
    }
}

impl DvtSerialize for Input {
    fn dvt_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        match self {
            Input::PrevOut {
                outpoint,
                unlock_script,
                sequence,
            } => {
                outpoint.dvt_serialize(&mut writer)?;
                unlock_script.dvt_serialize(&mut writer)?;
                writer.write_u32::<LittleEndian>(*sequence)?;
            }
            Input::Coinbase {
                height,
                data,
                sequence,
            } => {
                // A coinbase input spends the null outpoint.
                writer.write_32_bytes(&transaction::Hash([0; 32]).0)?;
                writer.write_u32::<LittleEndian>(u32::MAX)?;

                let CoinbaseData(data) = data;
                let script_len = coinbase_height_len(*height) + data.len();
                writer.write_compactsize(script_len as u64)?;
                write_coinbase_height(*height, &mut writer)?;
                writer.write_all(&data[..])?;

                writer.write_u32::<LittleEndian>(*sequence)?;
            }
        }

        Ok(())
    }
}

impl DvtSerialize for Output {
    fn dvt_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        self.value.dvt_serialize(&mut writer)?;
        self.lock_script.dvt_serialize(&mut writer)?;
        Ok(())
    }
}
