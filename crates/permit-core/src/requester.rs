//! Signature requester.
//!
//! Turns permit parameters into a typed-data request, asks the signer for a
//! signature over it and splits the answer into `(r, s, v)`.
//!
//! Each call is a single request/response. Nothing is retried or cached:
//! signing the same nonce twice yields two valid-looking signatures of which
//! at most one can ever be redeemed.

use crate::domain::build_domain_and_types;
use crate::PermitError;
use permit_signer::TypedDataSigner;
use permit_types::utils::PERMIT_PRIMARY_TYPE;
use permit_types::{
	Eip2612Params, PermitDialect, PermitMessage, PermitParams, PermitSignature, SignRequest,
	TypedDataRequest,
};

/// Builds the typed-data payload for a sign request.
///
/// The signing account is always the declared owner.
pub fn typed_data_for(request: &SignRequest) -> TypedDataRequest {
	let params = request.params();
	let (domain, types) = build_domain_and_types(request.dialect(), params);

	let message = match request {
		SignRequest::Eip2612(eip2612) => PermitMessage::Eip2612 {
			owner: params.owner,
			spender: params.spender,
			value: eip2612.value,
			nonce: params.nonce,
			deadline: params.deadline,
		},
		// Dai permits are all-or-nothing; this layer only ever grants.
		SignRequest::Dai(_) => PermitMessage::Dai {
			holder: params.owner,
			spender: params.spender,
			nonce: params.nonce,
			expiry: params.deadline,
			allowed: true,
		},
	};

	TypedDataRequest {
		account: params.owner,
		domain,
		primary_type: PERMIT_PRIMARY_TYPE.to_string(),
		types,
		message,
	}
}

/// Signs a permit in whichever dialect the request names.
pub async fn sign_permit(
	signer: &dyn TypedDataSigner,
	request: &SignRequest,
) -> Result<PermitSignature, PermitError> {
	let typed_data = typed_data_for(request);
	request_signature(signer, request.dialect(), &typed_data).await
}

/// Signs an EIP-2612 permit.
pub async fn sign_permit_2612(
	signer: &dyn TypedDataSigner,
	params: &Eip2612Params,
) -> Result<PermitSignature, PermitError> {
	sign_permit(signer, &SignRequest::Eip2612(params.clone())).await
}

/// Signs a Dai-style permit granting an unlimited allowance.
///
/// `params.nonce` is the holder's Dai permit nonce and `params.deadline` is
/// used as `expiry`.
pub async fn sign_permit_dai(
	signer: &dyn TypedDataSigner,
	params: &PermitParams,
) -> Result<PermitSignature, PermitError> {
	sign_permit(signer, &SignRequest::Dai(params.clone())).await
}

async fn request_signature(
	signer: &dyn TypedDataSigner,
	dialect: PermitDialect,
	typed_data: &TypedDataRequest,
) -> Result<PermitSignature, PermitError> {
	tracing::debug!(
		%dialect,
		account = %typed_data.account,
		token = %typed_data.domain.verifying_contract,
		digest = %typed_data.signing_hash(),
		"Requesting permit signature"
	);

	let raw = signer.sign_typed_data(typed_data).await.map_err(|e| {
		tracing::warn!(%dialect, error = %e, "Permit signature request failed");
		e
	})?;

	let signature = PermitSignature::from_hex(&raw)?;
	tracing::info!(%dialect, account = %typed_data.account, v = signature.v, "Signed permit");

	Ok(signature)
}
