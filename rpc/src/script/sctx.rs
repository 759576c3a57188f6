use num_bigint::BigUint;
use num_traits::Zero;
use rlp::{Encodable, RlpStream};

use super::types::{Coins, SmartContractTx, TxInput, TxOutput};

/// Native type tag of a smart contract transaction.
pub const SMART_CONTRACT_TX_TYPE: u8 = 7;

/// Minimal big-endian integer bytes, as RLP expects; zero is empty.
pub fn rlp_uint(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

impl Encodable for Coins {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&rlp_uint(&self.scptwei));
        s.append(&rlp_uint(&self.spaywei));
    }
}

impl Encodable for TxInput {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        s.append(&self.address.as_bytes().to_vec());
        s.append(&self.coins);
        s.append(&self.sequence);
        s.append(&self.signature);
    }
}

impl Encodable for TxOutput {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.address.as_bytes().to_vec());
        s.append(&self.coins);
    }
}

impl Encodable for SmartContractTx {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(5);
        s.append(&self.from);
        s.append(&self.to);
        s.append(&self.gas_limit);
        s.append(&rlp_uint(&self.gas_price));
        s.append(&self.data);
    }
}

impl SmartContractTx {
    /// Node wire form: the RLP type tag followed by the RLP body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = rlp::encode(&SMART_CONTRACT_TX_TYPE).to_vec();
        bytes.extend_from_slice(&rlp::encode(self));
        bytes
    }
}
