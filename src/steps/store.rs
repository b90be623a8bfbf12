//! Store scenario clauses: orders and inventory.

use super::{Harness, ship_date_now, step};
use crate::client::{ApiCall, ApiResponse, Endpoint};
use crate::context::{Lookup, ScenarioContext, StepKind};
use crate::error::{HarnessError, Result};
use crate::evidence::record_entries;
use crate::model::{Credentials, Inventory, Order, OrderRequest};
use crate::table::parse_first;

/// Statuses whose inventory counts are reported when present.
const REPORTED_STATUSES: [&str; 3] = ["available", "pending", "sold"];

/// Timestamp shape accepted for ship dates echoed by the service. The
/// offset may omit its colon, as the reference service writes `+0000`.
const SHIP_DATE_PATTERN: &str = r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})";

/// Indicators expected somewhere in a validation failure body.
const VALIDATION_INDICATORS: [&str; 3] = ["error", "invalid", "missing"];

/// Given I am authenticated as a store manager.
///
/// The service has no session flow; authentication means using the
/// configured API key on store-manager calls.
///
/// # Errors
///
/// Returns a configuration error when the table lacks `username` or
/// `password`.
pub fn authenticate_store_manager(
    harness: &Harness,
    ctx: &mut ScenarioContext,
    table: Vec<Vec<String>>,
) -> Result<()> {
    step(ctx, StepKind::Given, |ctx| {
        let manager: Credentials = parse_first(table)?;
        ctx.set_api_key(harness.api_key());
        harness.record(
            "Store Manager Authentication",
            &format!("Store manager authenticated: {}", manager.username),
        );
        Ok(())
    })
}

/// Given I have an order with the following details. The ship date is now.
///
/// # Errors
///
/// Returns a configuration error for missing or unparseable columns.
pub fn order_details(
    harness: &Harness,
    ctx: &mut ScenarioContext,
    table: Vec<Vec<String>>,
) -> Result<()> {
    step(ctx, StepKind::Given, |ctx| {
        let mut request: OrderRequest = parse_first(table)?;
        if request.ship_date.is_none() {
            request.ship_date = Some(ship_date_now()?);
        }
        record_entries(
            harness.reporter(),
            "Order Request",
            [
                ("Pet ID", render(request.pet_id)),
                ("Quantity", render(request.quantity)),
                ("Status", render(request.status.as_deref())),
                ("Ship Date", render(request.ship_date.as_deref())),
            ],
        );
        ctx.order.set_request(request);
        Ok(())
    })
}

/// Given I have an invalid order with missing required fields.
///
/// # Errors
///
/// Only fails when the step arrives out of order.
pub fn invalid_order(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Given, |ctx| {
        ctx.order.set_request(OrderRequest {
            status: Some(String::from("placed")),
            ..OrderRequest::default()
        });
        harness.record("Invalid Order Request", "Deliberately missing required fields");
        Ok(())
    })
}

/// When I send a request to place the order.
///
/// # Errors
///
/// Returns transport errors, or a decode error when a successful response
/// is not an order.
pub fn place_order(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let call = ApiCall::new(Endpoint::PlaceOrder)
            .with_api_key(ctx.api_key())
            .with_json(ctx.order.require_request()?)?;
        let response = harness.send(ctx, &call, "Order Creation Error")?;
        if response.is_success() {
            let order: Order = harness.decode(&response, "order", "Order Creation Error")?;
            if let Some(id) = order.id {
                ctx.order.set_id(id);
            }
            ctx.order.set_response(order);
        } else {
            ctx.order.clear_response();
        }
        harness.record("Order Creation Response", response.body());
        Ok(())
    })
}

/// When I try to place the invalid order: captures any status.
///
/// # Errors
///
/// Returns transport errors only.
pub fn try_place_invalid_order(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let call = ApiCall::new(Endpoint::PlaceOrder)
            .with_api_key(ctx.api_key())
            .with_json(ctx.order.require_request()?)?;
        let response = harness.send(ctx, &call, "Order Placement Error")?;
        harness.record("Invalid Order Placement", &status_and_body(&response));
        Ok(())
    })
}

/// When I retrieve the order by ID.
///
/// A 404 is captured as a not-found lookup so a later step can assert it.
///
/// # Errors
///
/// Returns [`HarnessError::UnexpectedStatus`] for any status
/// other than 2xx or 404, plus transport and decode errors.
pub fn retrieve_order(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let id = *ctx.order.require_id()?;
        let call = ApiCall::new(Endpoint::GetOrder(id)).with_api_key(ctx.api_key());
        let response = harness.send(ctx, &call, "Order Retrieval Error")?;
        harness.ensure_readable("get order", "Order Retrieval Error", &response)?;
        if response.is_success() {
            let order: Order = harness.decode(&response, "order", "Order Retrieval Error")?;
            harness.record(
                "Retrieved Order",
                &format!(
                    "Order ID: {}\nStatus: {}",
                    render(order.id),
                    render(order.status.as_deref())
                ),
            );
            ctx.order.set_response(order);
            ctx.order.set_lookup(Lookup::Live);
        } else {
            harness.record("Order Retrieval Failed", &status_and_body(&response));
            ctx.order.clear_response();
            ctx.order.set_lookup(Lookup::NotFound);
        }
        Ok(())
    })
}

/// When I try to retrieve an order with an explicit ID: captures any status.
///
/// # Errors
///
/// Returns transport errors only.
pub fn try_retrieve_order(harness: &Harness, ctx: &mut ScenarioContext, id: i64) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let call = ApiCall::new(Endpoint::GetOrder(id)).with_api_key(ctx.api_key());
        let response = harness.send(ctx, &call, "Order Retrieval Error")?;
        harness.record("Invalid Order Retrieval", &status_and_body(&response));
        Ok(())
    })
}

/// When I update the order status: re-submit the current order with the new
/// status, which is how the service models updates.
///
/// # Errors
///
/// Returns a missing-state error when no order was placed or retrieved,
/// plus transport and decode errors.
pub fn update_order_status(
    harness: &Harness,
    ctx: &mut ScenarioContext,
    status: &str,
) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let mut update = OrderRequest::status_update(ctx.order.require_response()?, status);
        if update.id.is_none() {
            update.id = ctx.order.id().copied();
        }
        let call = ApiCall::new(Endpoint::PlaceOrder)
            .with_api_key(ctx.api_key())
            .with_json(&update)?;
        let response = harness.send(ctx, &call, "Order Update Error")?;
        if response.is_success() {
            ctx.order.set_response(harness.decode(&response, "order", "Order Update Error")?);
        }
        ctx.order.set_request(update);
        harness.record("Order Update", &format!("Updated status to: {status}"));
        Ok(())
    })
}

/// When I delete the order.
///
/// # Errors
///
/// Returns transport errors, or a missing-state error when no order id is
/// known.
pub fn delete_order(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let id = *ctx.order.require_id()?;
        let call = ApiCall::new(Endpoint::DeleteOrder(id)).with_api_key(ctx.api_key());
        let response = harness.send(ctx, &call, "Order Deletion Error")?;
        harness.record("Order Deletion", &status_and_body(&response));
        Ok(())
    })
}

/// When I try to delete an order with an explicit ID: captures any status.
///
/// # Errors
///
/// Returns transport errors only.
pub fn try_delete_order(harness: &Harness, ctx: &mut ScenarioContext, id: i64) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let call = ApiCall::new(Endpoint::DeleteOrder(id)).with_api_key(ctx.api_key());
        let response = harness.send(ctx, &call, "Order Deletion Error")?;
        harness.record("Invalid Order Deletion", &status_and_body(&response));
        Ok(())
    })
}

/// When I request the store inventory.
///
/// # Errors
///
/// Returns [`HarnessError::UnexpectedStatus`] for a non-2xx
/// answer, plus transport and decode errors.
pub fn request_inventory(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let call = ApiCall::new(Endpoint::Inventory).with_api_key(ctx.api_key());
        let response = harness.send(ctx, &call, "Inventory Request Error")?;
        if !response.is_success() {
            return Err(harness.exception(
                "Inventory Request Error",
                HarnessError::UnexpectedStatus {
                    operation: "get inventory",
                    status: response.status(),
                    body: response.body().to_owned(),
                },
            ));
        }
        let inventory: Inventory =
            harness.decode(&response, "inventory", "Inventory Request Error")?;
        record_entries(harness.reporter(), "Store Inventory", inventory.iter());
        ctx.set_inventory(inventory);
        Ok(())
    })
}

/// Then the order should be created successfully.
///
/// # Errors
///
/// Returns an assertion error unless the service answered 200 with an order
/// carrying an identifier.
pub fn order_created(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        let verify = harness.verify();
        verify.status_code(ctx.require_last_response()?.status(), 200)?;
        let order = ctx.order.require_response()?;
        verify.bool_equals("Order ID present", order.id.is_some(), true)
    })
}

/// Then I should get a valid order ID.
///
/// # Errors
///
/// Returns an assertion error unless the identifier is positive.
pub fn valid_order_id(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        harness
            .verify()
            .number_greater_than("Order ID", ctx.order.id().copied(), 0_i64)
    })
}

/// Then I should get status code `expected`.
///
/// # Errors
///
/// Returns an assertion error when the latest status differs.
pub fn status_code_is(harness: &Harness, ctx: &mut ScenarioContext, expected: u16) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        harness
            .verify()
            .status_code(ctx.require_last_response()?.status(), expected)
    })
}

/// Then the order details should match the created order.
///
/// # Errors
///
/// Returns an assertion error when pet id, quantity or status differ, or
/// when a submitted ship date comes back as something other than a
/// timestamp.
pub fn order_matches_request(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        let verify = harness.verify();
        let request = ctx.order.require_request()?;
        let order = ctx.order.require_response()?;
        verify.number_equals("Pet ID", order.pet_id, request.pet_id)?;
        verify.number_equals("Quantity", order.quantity, request.quantity)?;
        verify.string_equals("Status", order.status.as_deref(), request.status.as_deref())?;
        if request.ship_date.is_some() {
            verify.string_matches("Ship Date", order.ship_date.as_deref(), SHIP_DATE_PATTERN)?;
        }
        Ok(())
    })
}

/// Then the order should be updated successfully.
///
/// # Errors
///
/// Returns an assertion error unless the update answered 200.
pub fn order_updated(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    status_code_is(harness, ctx, 200)
}

/// Then the updated order should have status `expected`.
///
/// # Errors
///
/// Returns an assertion error when the status differs.
pub fn updated_status_is(
    harness: &Harness,
    ctx: &mut ScenarioContext,
    expected: &str,
) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        let order = ctx.order.require_response()?;
        harness
            .verify()
            .string_equals("Order status", order.status.as_deref(), expected)
    })
}

/// Then the order should be deleted successfully.
///
/// # Errors
///
/// Returns an assertion error unless the deletion answered 200.
pub fn order_deleted(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    status_code_is(harness, ctx, 200)
}

/// Then I should get the inventory status.
///
/// # Errors
///
/// Returns an assertion error unless the inventory request answered 200.
pub fn inventory_received(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        harness
            .verify()
            .status_code(ctx.require_last_response()?.status(), 200)?;
        ctx.require_inventory().map(|_| ())
    })
}

/// Then the inventory should contain status counts.
///
/// # Errors
///
/// Returns an assertion error when the inventory is empty or a reported
/// count is negative.
pub fn inventory_has_counts(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        let verify = harness.verify();
        let inventory = ctx.require_inventory()?;
        harness.record(
            "Inventory Validation",
            &format!("Inventory has {} status categories", inventory.len()),
        );
        verify.number_greater_than("Inventory status categories", inventory.len(), 0_usize)?;
        for status in REPORTED_STATUSES {
            if let Some(count) = inventory.count(status) {
                verify.number_greater_than(
                    &format!("Inventory Count [{status}]"),
                    count,
                    -1_i64,
                )?;
            }
        }
        Ok(())
    })
}

/// Then I should receive an error message containing `expected`.
///
/// The message is the JSON `message` field when present, otherwise the raw
/// body; the comparison ignores case.
///
/// # Errors
///
/// Returns an assertion error when the message does not contain `expected`.
pub fn error_message_contains(
    harness: &Harness,
    ctx: &mut ScenarioContext,
    expected: &str,
) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        let message = ctx.require_last_response()?.message();
        harness.record("Error Message", &message);
        harness.verify().string_contains(
            "Error message",
            message.to_lowercase().as_str(),
            &expected.to_lowercase(),
        )
    })
}

/// Then the order creation should fail.
///
/// # Errors
///
/// Returns an assertion error when the service answered 200.
pub fn order_creation_failed(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        harness.verify().number_differs(
            "Order Creation",
            ctx.require_last_response()?.status(),
            200_u16,
        )
    })
}

/// Then I should get appropriate validation errors.
///
/// # Errors
///
/// Returns an assertion error when the body mentions none of the
/// validation indicators.
pub fn validation_errors_present(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        let body = ctx.require_last_response()?.body();
        harness.record("Validation Error Response", body);
        harness
            .verify()
            .contains_any("Validation errors", body, &VALIDATION_INDICATORS)
    })
}

fn render<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| String::from(crate::verify::ABSENT), |inner| inner.to_string())
}

fn status_and_body(response: &ApiResponse) -> String {
    format!("Status code: {}\nResponse: {}", response.status(), response.body())
}
