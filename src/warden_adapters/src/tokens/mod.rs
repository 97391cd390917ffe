pub mod jwt_token_signer;
