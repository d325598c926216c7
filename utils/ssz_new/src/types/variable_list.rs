use super::*;

impl<T: SszEncode + Clone, N: Unsigned> SszEncode for VariableList<T, N> {
    fn as_ssz_bytes(&self) -> Vec<u8> {
        self.to_vec().as_ssz_bytes()
    }

    fn is_ssz_fixed_len() -> bool {
        false
    }
}

impl<T: SszDecode, N: Unsigned> SszDecode for VariableList<T, N> {
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszDecodeError> {
        let items = <Vec<T>>::from_ssz_bytes(bytes)?;

        Self::new(items).map_err(|e| {
            SszDecodeError::BytesInvalid(format!("Failed while creating VariableList: {:?}", e))
        })
    }

    fn is_ssz_fixed_len() -> bool {
        <Vec<T>>::is_ssz_fixed_len()
    }

    fn ssz_fixed_len() -> usize {
        <Vec<T>>::ssz_fixed_len()
    }
}
