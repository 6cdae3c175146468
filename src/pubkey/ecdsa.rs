use bytes::Bytes;
use ecdsa::elliptic_curve;
use ecdsa::elliptic_curve::generic_array::ArrayLength;
use num_bigint_dig::BigUint;
use std::fmt;
use crate::codec::{PacketDecode, PacketEncode};
use crate::error::{Result, Error};
use super::{PubkeyAlgo, Pubkey, SignatureVerified};

/// "ecdsa-sha2-nistp256" public key algorithm from RFC 5656.
///
/// This algorithm is compatible with [`EcdsaPubkey<p256::NistP256>`].
pub static ECDSA_SHA2_NISTP256: PubkeyAlgo = PubkeyAlgo {
    name: "ecdsa-sha2-nistp256",
    verify: |pubkey, message, signature| match pubkey {
        Pubkey::EcdsaP256(pubkey) => verify(&pubkey.verifying, "ecdsa-sha2-nistp256", message, signature),
        _ => Err(Error::PubkeyFormat),
    },
};

/// "ecdsa-sha2-nistp384" public key algorithm from RFC 5656.
///
/// This algorithm is compatible with [`EcdsaPubkey<p384::NistP384>`].
pub static ECDSA_SHA2_NISTP384: PubkeyAlgo = PubkeyAlgo {
    name: "ecdsa-sha2-nistp384",
    verify: |pubkey, message, signature| match pubkey {
        Pubkey::EcdsaP384(pubkey) => verify(&pubkey.verifying, "ecdsa-sha2-nistp384", message, signature),
        _ => Err(Error::PubkeyFormat),
    },
};

/// ECDSA public key using curve `C`.
///
/// - `EcdsaPubkey<p256::NistP256>` is compatible with [`ECDSA_SHA2_NISTP256`].
/// - `EcdsaPubkey<p384::NistP384>` is compatible with [`ECDSA_SHA2_NISTP384`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdsaPubkey<C>
    where C: ecdsa::PrimeCurve + elliptic_curve::CurveArithmetic,
{
    pub(crate) verifying: ecdsa::VerifyingKey<C>,
}

fn verify<C>(
    verifying: &ecdsa::VerifyingKey<C>,
    algo_name: &'static str,
    message: &[u8],
    signature: Bytes,
) -> Result<SignatureVerified>
    where C: ecdsa::PrimeCurve + elliptic_curve::CurveArithmetic,
          ecdsa::SignatureSize<C>: ArrayLength<u8>,
          ecdsa::VerifyingKey<C>: ecdsa::signature::Verifier<ecdsa::Signature<C>>,
{
    let mut signature = PacketDecode::new(signature);
    if signature.get_string()? != algo_name {
        return Err(Error::Decode("unexpected signature format"))
    }

    // RFC 5656, section 3.1.2
    let to_field_bytes = |scalar: BigUint| -> Result<elliptic_curve::FieldBytes<C>> {
        let scalar = scalar.to_bytes_be();
        let mut scalar_bytes = elliptic_curve::FieldBytes::<C>::default();
        if scalar.len() > scalar_bytes.len() {
            return Err(Error::Signature)
        }
        let copy_idx = scalar_bytes.len() - scalar.len();
        scalar_bytes[copy_idx..].copy_from_slice(&scalar);
        Ok(scalar_bytes)
    };

    let mut signature_blob = PacketDecode::new(signature.get_bytes()?);
    let r = to_field_bytes(signature_blob.get_biguint()?)?;
    let s = to_field_bytes(signature_blob.get_biguint()?)?;
    let ecdsa_signature = ecdsa::Signature::<C>::from_scalars(r, s)
        .map_err(|_| Error::Signature)?;

    use ecdsa::signature::Verifier as _;
    match verifying.verify(message, &ecdsa_signature) {
        Ok(_) => Ok(SignatureVerified::assertion()),
        Err(_) => Err(Error::Signature),
    }
}

pub(super) fn decode_p256(blob: &mut PacketDecode) -> Result<EcdsaPubkey<p256::NistP256>> {
    let point = decode_point(blob, "nistp256")?;
    let verifying = p256::ecdsa::VerifyingKey::from_sec1_bytes(&point)
        .map_err(|_| Error::Decode("ecdsa public key is invalid (bad point)"))?;
    Ok(EcdsaPubkey { verifying })
}

pub(super) fn decode_p384(blob: &mut PacketDecode) -> Result<EcdsaPubkey<p384::NistP384>> {
    let point = decode_point(blob, "nistp384")?;
    let verifying = p384::ecdsa::VerifyingKey::from_sec1_bytes(&point)
        .map_err(|_| Error::Decode("ecdsa public key is invalid (bad point)"))?;
    Ok(EcdsaPubkey { verifying })
}

fn decode_point(blob: &mut PacketDecode, curve_name: &str) -> Result<Bytes> {
    if blob.get_string()? != curve_name {
        return Err(Error::Decode("bad curve name of ecdsa public key"))
    }
    blob.get_bytes()
}

pub(super) fn encode_p256(blob: &mut PacketEncode, pubkey: &EcdsaPubkey<p256::NistP256>) {
    blob.put_str("ecdsa-sha2-nistp256");
    blob.put_str("nistp256");
    blob.put_bytes(pubkey.verifying.to_encoded_point(false).as_bytes());
}

pub(super) fn encode_p384(blob: &mut PacketEncode, pubkey: &EcdsaPubkey<p384::NistP384>) {
    blob.put_str("ecdsa-sha2-nistp384");
    blob.put_str("nistp384");
    blob.put_bytes(pubkey.verifying.to_encoded_point(false).as_bytes());
}

impl<C> From<ecdsa::VerifyingKey<C>> for EcdsaPubkey<C>
    where C: ecdsa::PrimeCurve + elliptic_curve::CurveArithmetic,
{
    fn from(verifying: ecdsa::VerifyingKey<C>) -> Self {
        Self { verifying }
    }
}

impl fmt::Display for EcdsaPubkey<p256::NistP256> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = Bytes::copy_from_slice(self.verifying.to_encoded_point(true).as_bytes());
        write!(f, "ecdsa-nistp256 {:x}", bytes)
    }
}

impl fmt::Display for EcdsaPubkey<p384::NistP384> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = Bytes::copy_from_slice(self.verifying.to_encoded_point(true).as_bytes());
        write!(f, "ecdsa-nistp384 {:x}", bytes)
    }
}
