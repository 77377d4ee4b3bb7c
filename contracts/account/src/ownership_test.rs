#![cfg(test)]

use crate::{AccountError, OwnershipState, ProtectedAccount, ProtectedAccountClient};
use soroban_sdk::{testutils::Address as _, Address, Bytes, BytesN, Env};

struct Ctx {
    env: Env,
    client: ProtectedAccountClient<'static>,
    owner: Address,
    new_owner: Address,
}

fn setup() -> Ctx {
    let env = Env::default();
    env.mock_all_auths();
    let id = env.register(ProtectedAccount, ());
    let client = ProtectedAccountClient::new(&env, &id);
    let owner = Address::generate(&env);
    let new_owner = Address::generate(&env);
    client.initialize(&owner);
    Ctx {
        env,
        client,
        owner,
        new_owner,
    }
}

fn cafe_key(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[0xca; 32])
}

#[test]
fn owner_can_start_transfer() {
    let ctx = setup();
    assert_eq!(ctx.client.ownership_state(), OwnershipState::Stable);

    ctx.client.transfer_ownership(&ctx.owner, &ctx.new_owner);

    assert_eq!(ctx.client.ownership_state(), OwnershipState::PendingClaim);
    assert_eq!(ctx.client.pending_owner(), Some(ctx.new_owner.clone()));
}

#[test]
fn non_owner_cannot_start_transfer() {
    let ctx = setup();
    let result = ctx
        .client
        .try_transfer_ownership(&ctx.new_owner, &ctx.new_owner);
    assert_eq!(result, Err(Ok(AccountError::NotOwner)));
    assert_eq!(ctx.client.ownership_state(), OwnershipState::Stable);
}

#[test]
fn owner_unchanged_until_claimed() {
    let ctx = setup();
    ctx.client.transfer_ownership(&ctx.owner, &ctx.new_owner);
    assert_eq!(ctx.client.owner(), ctx.owner);
}

#[test]
fn second_transfer_rejected_while_pending() {
    let ctx = setup();
    ctx.client.transfer_ownership(&ctx.owner, &ctx.new_owner);

    let other = Address::generate(&ctx.env);
    let result = ctx.client.try_transfer_ownership(&ctx.owner, &other);
    assert_eq!(result, Err(Ok(AccountError::OngoingTransfer)));
    assert_eq!(ctx.client.pending_owner(), Some(ctx.new_owner.clone()));
}

#[test]
fn cannot_transfer_to_the_account_itself() {
    let ctx = setup();
    let result = ctx
        .client
        .try_transfer_ownership(&ctx.owner, &ctx.client.address);
    assert_eq!(result, Err(Ok(AccountError::CannotTransferToSelf)));
}

#[test]
fn nobody_can_claim_without_transfer() {
    let ctx = setup();
    let result = ctx.client.try_claim_ownership(&ctx.new_owner);
    assert_eq!(result, Err(Ok(AccountError::NotAllowedToClaim)));
}

#[test]
fn random_account_cannot_claim() {
    let ctx = setup();
    ctx.client.transfer_ownership(&ctx.owner, &ctx.new_owner);

    let random = Address::generate(&ctx.env);
    let result = ctx.client.try_claim_ownership(&random);
    assert_eq!(result, Err(Ok(AccountError::NotAllowedToClaim)));
    assert_eq!(ctx.client.owner(), ctx.owner);
}

#[test]
fn candidate_claims_and_becomes_owner() {
    let ctx = setup();
    ctx.client.transfer_ownership(&ctx.owner, &ctx.new_owner);
    ctx.client.claim_ownership(&ctx.new_owner);

    assert_eq!(ctx.client.owner(), ctx.new_owner);
    assert_eq!(ctx.client.pending_owner(), None);
    assert_eq!(ctx.client.ownership_state(), OwnershipState::Stable);
}

#[test]
fn candidate_has_no_authority_before_claim() {
    let ctx = setup();
    ctx.client.transfer_ownership(&ctx.owner, &ctx.new_owner);

    let value = Bytes::from_array(&ctx.env, &[0xbe, 0xef, 0xbe, 0xef]);
    let result = ctx
        .client
        .try_set_data(&ctx.new_owner, &cafe_key(&ctx.env), &value);
    assert_eq!(result, Err(Ok(AccountError::NotOwner)));
}

#[test]
fn previous_owner_keeps_authority_while_pending() {
    let ctx = setup();
    ctx.client.transfer_ownership(&ctx.owner, &ctx.new_owner);

    let value = Bytes::from_array(&ctx.env, &[0xbe, 0xef, 0xbe, 0xef]);
    ctx.client.set_data(&ctx.owner, &cafe_key(&ctx.env), &value);
    assert_eq!(ctx.client.get_data(&cafe_key(&ctx.env)), value);
}

#[test]
fn previous_owner_loses_authority_after_claim() {
    let ctx = setup();
    ctx.client.transfer_ownership(&ctx.owner, &ctx.new_owner);
    ctx.client.claim_ownership(&ctx.new_owner);

    let value = Bytes::from_array(&ctx.env, &[1]);
    let result = ctx
        .client
        .try_set_data(&ctx.owner, &cafe_key(&ctx.env), &value);
    assert_eq!(result, Err(Ok(AccountError::NotOwner)));
}

#[test]
fn new_transfer_allowed_after_claim() {
    let ctx = setup();
    ctx.client.transfer_ownership(&ctx.owner, &ctx.new_owner);
    ctx.client.claim_ownership(&ctx.new_owner);

    ctx.client.transfer_ownership(&ctx.new_owner, &ctx.owner);
    assert_eq!(ctx.client.pending_owner(), Some(ctx.owner.clone()));
}
