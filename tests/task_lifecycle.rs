//! End-to-end task lifecycle: funding, co-signed mutations, commit-reveal
//! ratings, finalization, and payout claims

mod common;

use colony::authorization::calls::{
    self, CancelTask, FinalizeTask, SetTaskBrief, SetTaskDueDate, SetTaskPayout, SetTaskRole,
};
use colony::authorization::EncodedCall;
use colony::common::{DomainId, PotId, SkillId};
use colony::crypto::{keccak256, rating_secret};
use colony::tasks::{LifecycleError, Role, TaskStatus};
use colony::{ColonyError, ColonyEvent};

use common::{harness, sign};

#[tokio::test]
async fn test_full_task_lifecycle() {
    let h = harness();
    let (m, e, w) = (&h.manager, &h.evaluator, &h.worker);
    let token = h.colony.native_token();

    // fund the root pot through issuance
    h.colony.set_issuance_rate(600, 60, 1_000_000).await.unwrap();
    h.clock.advance(60);
    h.colony.mint_tokens(300).await.unwrap();
    assert_eq!(h.colony.total_supply().await, 300);

    let task = h
        .colony
        .create_task(m.address(), DomainId(1), SkillId(1))
        .await
        .unwrap();
    let pot = h.colony.task(task).await.unwrap().pot_id;

    // assign the worker and evaluator, each consenting to their own slot
    let params = SetTaskRole {
        task,
        role: Role::Worker,
        address: w.address(),
    };
    let call = EncodedCall::new(calls::set_task_role(Role::Worker), &params).unwrap();
    h.colony
        .set_task_role(params, &sign(&[m, w], task, 0, &call))
        .await
        .unwrap();

    let params = SetTaskRole {
        task,
        role: Role::Evaluator,
        address: e.address(),
    };
    let call = EncodedCall::new(calls::set_task_role(Role::Evaluator), &params).unwrap();
    h.colony
        .set_task_role(params, &sign(&[m, e], task, 1, &call))
        .await
        .unwrap();

    // brief and due date, manager + worker co-signing
    let params = SetTaskBrief {
        task,
        brief: keccak256(b"build the thing"),
    };
    let call = EncodedCall::new(calls::set_task_brief(), &params).unwrap();
    h.colony
        .set_task_brief(params, &sign(&[m, w], task, 2, &call))
        .await
        .unwrap();

    let params = SetTaskDueDate {
        task,
        due_date: common::T0 + 600,
    };
    let call = EncodedCall::new(calls::set_task_due_date(), &params).unwrap();
    h.colony
        .set_task_due_date(params, &sign(&[m, w], task, 3, &call))
        .await
        .unwrap();

    // fund the task pot, then commit payouts up to its balance
    h.colony.move_funds(PotId(1), pot, token, 200).await.unwrap();

    for (role, amount, cosigner, nonce) in [
        (Role::Manager, 100u128, m, 4u64),
        (Role::Evaluator, 50, e, 5),
        (Role::Worker, 50, w, 6),
    ] {
        let params = SetTaskPayout {
            task,
            role,
            token,
            amount,
        };
        let call = EncodedCall::new(calls::set_task_payout(role), &params).unwrap();
        let auth = if role == Role::Manager {
            sign(&[m], task, nonce, &call)
        } else {
            sign(&[m, cosigner], task, nonce, &call)
        };
        h.colony.set_task_payout(params, &auth).await.unwrap();
    }

    // commit-reveal: the evaluator rates the worker, the worker the manager
    let (salt_w, salt_m) = ([1u8; 32], [2u8; 32]);
    h.colony
        .submit_rating(task, Role::Worker, rating_secret(&salt_w, 3), e.address())
        .await
        .unwrap();
    h.colony
        .submit_rating(task, Role::Manager, rating_secret(&salt_m, 2), w.address())
        .await
        .unwrap();
    h.colony
        .reveal_rating(task, Role::Worker, 3, &salt_w, e.address())
        .await
        .unwrap();
    h.colony
        .reveal_rating(task, Role::Manager, 2, &salt_m, w.address())
        .await
        .unwrap();

    let params = FinalizeTask { task };
    let call = EncodedCall::new(calls::finalize_task(), &params).unwrap();
    h.colony
        .finalize_task(params, &sign(&[m, w], task, 7, &call))
        .await
        .unwrap();
    assert_eq!(h.colony.task(task).await.unwrap().status, TaskStatus::Finalized);

    // a settled task accepts no further funding
    assert!(matches!(
        h.colony.move_funds(PotId(1), pot, token, 10).await,
        Err(ColonyError::Lifecycle(LifecycleError::InvalidStateForOperation(_)))
    ));

    // each role claims exactly once
    assert_eq!(
        h.colony.claim_payout(task, Role::Manager, token, m.address()).await.unwrap(),
        100
    );
    assert_eq!(
        h.colony.claim_payout(task, Role::Evaluator, token, e.address()).await.unwrap(),
        50
    );
    assert_eq!(
        h.colony.claim_payout(task, Role::Worker, token, w.address()).await.unwrap(),
        50
    );
    assert_eq!(h.colony.pot_balance(pot, token).await.unwrap(), 0);

    assert!(matches!(
        h.colony.claim_payout(task, Role::Worker, token, w.address()).await,
        Err(ColonyError::Lifecycle(LifecycleError::AlreadyClaimed))
    ));

    let events = h.colony.events().await;
    assert!(events.contains(&ColonyEvent::TaskFinalized { task }));
    assert!(events.iter().any(|ev| matches!(
        ev,
        ColonyEvent::PayoutClaimed {
            role: Role::Worker,
            amount: 50,
            ..
        }
    )));
}

#[tokio::test]
async fn test_payout_cannot_exceed_task_pot() {
    let h = harness();
    let (m, w) = (&h.manager, &h.worker);
    let token = h.colony.native_token();

    h.colony.set_issuance_rate(600, 60, 1_000_000).await.unwrap();
    h.clock.advance(60);
    h.colony.mint_tokens(100).await.unwrap();

    let task = h
        .colony
        .create_task(m.address(), DomainId(1), SkillId(1))
        .await
        .unwrap();
    let pot = h.colony.task(task).await.unwrap().pot_id;
    h.colony.move_funds(PotId(1), pot, token, 80).await.unwrap();

    let params = SetTaskRole {
        task,
        role: Role::Worker,
        address: w.address(),
    };
    let call = EncodedCall::new(calls::set_task_role(Role::Worker), &params).unwrap();
    h.colony
        .set_task_role(params, &sign(&[m, w], task, 0, &call))
        .await
        .unwrap();

    // 100 committed against an 80-token pot
    let params = SetTaskPayout {
        task,
        role: Role::Worker,
        token,
        amount: 100,
    };
    let call = EncodedCall::new(calls::set_task_payout(Role::Worker), &params).unwrap();
    let result = h
        .colony
        .set_task_payout(params.clone(), &sign(&[m, w], task, 1, &call))
        .await;
    assert!(matches!(
        result,
        Err(ColonyError::Ledger(colony::ledger::LedgerError::PayoutExceedsPot { .. }))
    ));
    // the rejected call did not burn the nonce
    assert_eq!(h.colony.task_nonce(task).await.unwrap(), 1);

    // committed payouts pin the pot's funds in place
    let params = SetTaskPayout { amount: 80, ..params };
    let call = EncodedCall::new(calls::set_task_payout(Role::Worker), &params).unwrap();
    h.colony
        .set_task_payout(params, &sign(&[m, w], task, 1, &call))
        .await
        .unwrap();
    assert!(h.colony.move_funds(pot, PotId(1), token, 10).await.is_err());
}

#[tokio::test]
async fn test_cancelled_task_is_terminal() {
    let h = harness();
    let (m, w) = (&h.manager, &h.worker);

    let task = h
        .colony
        .create_task(m.address(), DomainId(1), SkillId(1))
        .await
        .unwrap();
    let params = SetTaskRole {
        task,
        role: Role::Worker,
        address: w.address(),
    };
    let call = EncodedCall::new(calls::set_task_role(Role::Worker), &params).unwrap();
    h.colony
        .set_task_role(params, &sign(&[m, w], task, 0, &call))
        .await
        .unwrap();

    let params = CancelTask { task };
    let call = EncodedCall::new(calls::cancel_task(), &params).unwrap();
    h.colony
        .cancel_task(params, &sign(&[m, w], task, 1, &call))
        .await
        .unwrap();
    assert_eq!(h.colony.task(task).await.unwrap().status, TaskStatus::Cancelled);

    // no further mutation, not even a fully-signed one
    let params = SetTaskBrief {
        task,
        brief: keccak256(b"too late"),
    };
    let call = EncodedCall::new(calls::set_task_brief(), &params).unwrap();
    assert!(matches!(
        h.colony
            .set_task_brief(params, &sign(&[m, w], task, 2, &call))
            .await,
        Err(ColonyError::Lifecycle(LifecycleError::InvalidStateForOperation(_)))
    ));
}

#[tokio::test]
async fn test_finalize_defaults_unrevealed_ratings_after_window() {
    let h = harness();
    let (m, e, w) = (&h.manager, &h.evaluator, &h.worker);

    let task = h
        .colony
        .create_task(m.address(), DomainId(1), SkillId(1))
        .await
        .unwrap();

    for (role, key, nonce) in [(Role::Worker, w, 0u64), (Role::Evaluator, e, 1)] {
        let params = SetTaskRole {
            task,
            role,
            address: key.address(),
        };
        let call = EncodedCall::new(calls::set_task_role(role), &params).unwrap();
        h.colony
            .set_task_role(params, &sign(&[m, key], task, nonce, &call))
            .await
            .unwrap();
    }

    let params = SetTaskDueDate {
        task,
        due_date: common::T0 + 100,
    };
    let call = EncodedCall::new(calls::set_task_due_date(), &params).unwrap();
    h.colony
        .set_task_due_date(params, &sign(&[m, w], task, 2, &call))
        .await
        .unwrap();

    // nobody rated anyone; before the window closes finalization fails
    let params = FinalizeTask { task };
    let call = EncodedCall::new(calls::finalize_task(), &params).unwrap();
    assert!(h
        .colony
        .finalize_task(params.clone(), &sign(&[m, w], task, 3, &call))
        .await
        .is_err());

    // past due date + reveal window: the neutral default fills in
    let window = h.colony.config().rating_reveal_window_secs;
    h.clock.set(common::T0 + 100 + window);
    h.colony
        .finalize_task(params, &sign(&[m, w], task, 3, &call))
        .await
        .unwrap();
    let snapshot = h.colony.task(task).await.unwrap();
    assert_eq!(snapshot.ratings[&Role::Worker].score, Some(2));
    assert_eq!(snapshot.ratings[&Role::Manager].score, Some(2));
}
