//! Database operations for goals, including the saved-balance mutations.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    goal::{Goal, GoalBuilder, GoalId, GoalKind},
};

/// Create a goal and return it with its generated ID. The saved balance
/// starts at zero.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_goal(builder: GoalBuilder, connection: &Connection) -> Result<Goal, Error> {
    let goal = connection
        .prepare(
            "INSERT INTO goal (name, category, amount, kind, saved)
             VALUES (?1, ?2, ?3, ?4, 0)
             RETURNING id, name, category, amount, kind, saved",
        )?
        .query_row(
            (
                builder.name,
                builder.category,
                builder.amount,
                builder.kind.as_str(),
            ),
            map_goal_row,
        )?;

    Ok(goal)
}

/// Retrieve a single goal by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid goal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_goal(goal_id: GoalId, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare("SELECT id, name, category, amount, kind, saved FROM goal WHERE id = :id")?
        .query_row(&[(":id", &goal_id)], map_goal_row)
        .map_err(|error| error.into())
}

/// Retrieve all goals in creation order.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_goals(connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare("SELECT id, name, category, amount, kind, saved FROM goal ORDER BY id ASC")?
        .query_map([], map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a goal's name, category, target and kind.
///
/// The saved balance is untouched: it only moves through [add_to_saved],
/// [subtract_from_saved] and [reset_saved].
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingGoal] if `id` does not refer to a valid goal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_goal(
    goal_id: GoalId,
    builder: GoalBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET name = ?1, category = ?2, amount = ?3, kind = ?4 WHERE id = ?5",
        (
            builder.name,
            builder.category,
            builder.amount,
            builder.kind.as_str(),
            goal_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Delete a goal by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingGoal] if `id` does not refer to a valid goal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_goal(goal_id: GoalId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM goal WHERE id = ?1", [goal_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    Ok(())
}

/// Add `delta` to a goal's saved balance.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidSavedAmount] if `delta` is not positive,
/// - [Error::UpdateMissingGoal] if `id` does not refer to a valid goal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn add_to_saved(goal_id: GoalId, delta: f64, connection: &Connection) -> Result<(), Error> {
    if delta <= 0.0 {
        return Err(Error::InvalidSavedAmount(delta));
    }

    let rows_affected = connection.execute(
        "UPDATE goal SET saved = saved + ?1 WHERE id = ?2",
        (delta, goal_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Subtract `delta` from a goal's saved balance, flooring at zero.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidSavedAmount] if `delta` is not positive,
/// - [Error::UpdateMissingGoal] if `id` does not refer to a valid goal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn subtract_from_saved(
    goal_id: GoalId,
    delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    if delta <= 0.0 {
        return Err(Error::InvalidSavedAmount(delta));
    }

    let rows_affected = connection.execute(
        "UPDATE goal SET saved = MAX(0, saved - ?1) WHERE id = ?2",
        (delta, goal_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Reset a goal's saved balance to zero.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingGoal] if `id` does not refer to a valid goal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn reset_saved(goal_id: GoalId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("UPDATE goal SET saved = 0 WHERE id = ?1", [goal_id])?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Create the goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            kind TEXT NOT NULL DEFAULT 'savings',
            saved REAL NOT NULL DEFAULT 0
            )",
        (),
    )?;

    Ok(())
}

fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    let kind: String = row.get(4)?;

    Ok(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        kind: GoalKind::parse(&kind),
        saved: row.get(5)?,
    })
}
