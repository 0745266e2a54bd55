//! Database operations for cards.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    card::{Card, CardBrand, CardBuilder, CardId},
};

/// Create a card and return it with its generated ID.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_card(builder: CardBuilder, connection: &Connection) -> Result<Card, Error> {
    let card = connection
        .prepare(
            "INSERT INTO card (name, brand, \"limit\", used, closing_day, due_day)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, name, brand, \"limit\", used, closing_day, due_day",
        )?
        .query_row(
            (
                builder.name,
                builder.brand.as_str(),
                builder.limit,
                builder.used,
                builder.closing_day,
                builder.due_day,
            ),
            map_card_row,
        )?;

    Ok(card)
}

/// Retrieve a single card by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid card,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_card(card_id: CardId, connection: &Connection) -> Result<Card, Error> {
    connection
        .prepare(
            "SELECT id, name, brand, \"limit\", used, closing_day, due_day
             FROM card WHERE id = :id",
        )?
        .query_row(&[(":id", &card_id)], map_card_row)
        .map_err(|error| error.into())
}

/// Retrieve all cards in creation order.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_cards(connection: &Connection) -> Result<Vec<Card>, Error> {
    connection
        .prepare(
            "SELECT id, name, brand, \"limit\", used, closing_day, due_day
             FROM card ORDER BY id ASC",
        )?
        .query_map([], map_card_row)?
        .map(|maybe_card| maybe_card.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the card with the given `id` with the builder's values.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingCard] if `id` does not refer to a valid card,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_card(card_id: CardId, builder: CardBuilder, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE card
         SET name = ?1, brand = ?2, \"limit\" = ?3, used = ?4, closing_day = ?5, due_day = ?6
         WHERE id = ?7",
        (
            builder.name,
            builder.brand.as_str(),
            builder.limit,
            builder.used,
            builder.closing_day,
            builder.due_day,
            card_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCard);
    }

    Ok(())
}

/// Delete a card by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingCard] if `id` does not refer to a valid card,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_card(card_id: CardId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM card WHERE id = ?1", [card_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCard);
    }

    Ok(())
}

/// Create the card table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_card_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS card (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            brand TEXT NOT NULL,
            \"limit\" REAL NOT NULL,
            used REAL NOT NULL DEFAULT 0,
            closing_day INTEGER,
            due_day INTEGER
            )",
        (),
    )?;

    Ok(())
}

fn map_card_row(row: &Row) -> Result<Card, rusqlite::Error> {
    let brand: String = row.get(2)?;

    Ok(Card {
        id: row.get(0)?,
        name: row.get(1)?,
        brand: CardBrand::parse(&brand),
        limit: row.get(3)?,
        used: row.get(4)?,
        closing_day: row.get(5)?,
        due_day: row.get(6)?,
    })
}

#[cfg(test)]
mod card_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        card::{CardBrand, CardBuilder},
    };

    use super::{
        create_card, create_card_table, delete_card, get_all_cards, get_card, update_card,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_card_table(&connection).expect("Could not create card table");
        connection
    }

    fn builder(name: &str) -> CardBuilder {
        CardBuilder {
            name: name.to_owned(),
            brand: CardBrand::Visa,
            limit: 1000.0,
            used: 0.0,
            closing_day: Some(5),
            due_day: Some(12),
        }
    }

    #[test]
    fn create_card_succeeds() {
        let connection = get_test_db_connection();

        let card = create_card(builder("Day to day"), &connection).expect("Could not create card");

        assert!(card.id > 0);
        assert_eq!(card.name, "Day to day");
        assert_eq!(card.brand, CardBrand::Visa);
        assert_eq!(card.limit, 1000.0);
        assert_eq!(card.closing_day, Some(5));
    }

    #[test]
    fn create_card_without_days_stores_nulls() {
        let connection = get_test_db_connection();
        let card = create_card(
            CardBuilder {
                closing_day: None,
                due_day: None,
                ..builder("No days")
            },
            &connection,
        )
        .unwrap();

        let selected = get_card(card.id, &connection).unwrap();

        assert_eq!(selected.closing_day, None);
        assert_eq!(selected.due_day, None);
    }

    #[test]
    fn get_card_round_trips() {
        let connection = get_test_db_connection();
        let inserted = create_card(builder("Foo"), &connection).unwrap();

        let selected = get_card(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_card_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_card(999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_all_cards_preserves_creation_order() {
        let connection = get_test_db_connection();
        create_card(builder("First"), &connection).unwrap();
        create_card(builder("Second"), &connection).unwrap();

        let all = get_all_cards(&connection).unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "First");
        assert_eq!(all[1].name, "Second");
    }

    #[test]
    fn update_card_overwrites_fields() {
        let connection = get_test_db_connection();
        let inserted = create_card(builder("Before"), &connection).unwrap();

        update_card(
            inserted.id,
            CardBuilder {
                name: "After".to_owned(),
                used: 420.0,
                ..builder("ignored")
            },
            &connection,
        )
        .unwrap();

        let updated = get_card(inserted.id, &connection).unwrap();
        assert_eq!(updated.name, "After");
        assert_eq!(updated.used, 420.0);
    }

    #[test]
    fn update_missing_card_errors() {
        let connection = get_test_db_connection();

        let result = update_card(999, builder("Ghost"), &connection);

        assert_eq!(result, Err(Error::UpdateMissingCard));
    }

    #[test]
    fn delete_card_removes_row() {
        let connection = get_test_db_connection();
        let inserted = create_card(builder("Doomed"), &connection).unwrap();

        delete_card(inserted.id, &connection).unwrap();

        assert_eq!(get_card(inserted.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_card_errors() {
        let connection = get_test_db_connection();

        assert_eq!(delete_card(999, &connection), Err(Error::DeleteMissingCard));
    }
}
