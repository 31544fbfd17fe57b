//! Joins across independently fetched collections.
//!
//! Each `*_rows` function resolves foreign keys against the other
//! collections and returns denormalized table rows. A key that points
//! nowhere becomes [`Value::Missing`] rather than an error.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::data::Collection;
use crate::data::model::{Apartment, Dataset, EntityId, User};
use crate::table::{Align, Column, Row, TableDescriptor, Value};

/// Shown for craftsmen that have not been rated yet.
pub const NO_SCORE: &str = "N/A";

const ISO_DATE: &str = "%Y-%m-%d";
const DISPLAY_DATE: &str = "%d.%m.%Y";

fn index_by_id<T>(items: &[T], id: impl Fn(&T) -> &EntityId) -> HashMap<&EntityId, &T> {
    items.iter().map(|item| (id(item), item)).collect()
}

fn iso(date: NaiveDate) -> Value {
    Value::Text(date.format(ISO_DATE).to_string())
}

/// Renders ISO dates as `dd.mm.yyyy`, leaving anything else untouched.
fn display_date(value: &Value) -> String {
    let raw = value.to_string();
    NaiveDate::parse_from_str(&raw, ISO_DATE)
        .map_or(raw, |date| date.format(DISPLAY_DATE).to_string())
}

fn display_amount(value: &Value) -> String {
    value
        .as_number()
        .map_or_else(|| value.to_string(), |n| format!("{n:.2}"))
}

fn user_name(users: &HashMap<&EntityId, &User>, id: Option<&EntityId>) -> Value {
    Value::optional(id.and_then(|id| users.get(id)).map(|u| u.name.clone()))
}

fn apartment_label(apartments: &HashMap<&EntityId, &Apartment>, id: &EntityId) -> Value {
    Value::optional(apartments.get(id).map(|a| a.label()))
}

pub fn apartment_rows(dataset: &Dataset) -> Vec<Row> {
    let users = index_by_id(&dataset.users, |u| &u.id);
    dataset
        .apartments
        .iter()
        .map(|apartment| {
            Row::new()
                .with("id", Value::id(&apartment.id))
                .with("label", apartment.label())
                .with("block", apartment.block.as_str())
                .with("number", apartment.number.as_str())
                .with("floor", Value::optional(apartment.floor))
                .with("rooms", Value::optional(apartment.rooms.clone()))
                .with("area", Value::optional(apartment.area_m2))
                .with("owner", user_name(&users, apartment.owner_id.as_ref()))
        })
        .collect()
}

pub fn apartment_columns() -> Vec<Column> {
    vec![
        Column::new("Block", "block").width(1),
        Column::new("No", "number").width(1).align(Align::Right),
        Column::new("Floor", "floor").width(1).align(Align::Right),
        Column::new("Rooms", "rooms").width(1).align(Align::Center),
        Column::new("Area m²", "area").width(1).align(Align::Right),
        Column::new("Owner", "owner").width(3),
    ]
}

/// Tenants with the apartment of their most recent contract.
pub fn tenant_rows(dataset: &Dataset) -> Vec<Row> {
    let apartments = index_by_id(&dataset.apartments, |a| &a.id);
    dataset
        .tenants()
        .map(|tenant| {
            let latest = dataset
                .contracts
                .iter()
                .filter(|c| c.tenant_id == tenant.id)
                .max_by_key(|c| c.start);
            Row::new()
                .with("id", Value::id(&tenant.id))
                .with("name", tenant.name.as_str())
                .with("email", Value::optional(tenant.email.clone()))
                .with("phone", Value::optional(tenant.phone.clone()))
                .with(
                    "apartment",
                    latest.map_or(Value::Missing, |c| apartment_label(&apartments, &c.apartment_id)),
                )
                .with("since", latest.map_or(Value::Missing, |c| iso(c.start)))
        })
        .collect()
}

pub fn tenant_columns() -> Vec<Column> {
    vec![
        Column::new("Name", "name").width(3),
        Column::new("Email", "email").width(3),
        Column::new("Phone", "phone").width(2),
        Column::new("Apartment", "apartment").width(1),
        Column::new("Since", "since")
            .width(1)
            .align(Align::Right)
            .render(display_date),
    ]
}

pub fn owner_rows(dataset: &Dataset) -> Vec<Row> {
    dataset
        .owners()
        .map(|owner| {
            let count = dataset
                .apartments
                .iter()
                .filter(|a| a.owner_id.as_ref() == Some(&owner.id))
                .count();
            Row::new()
                .with("id", Value::id(&owner.id))
                .with("name", owner.name.as_str())
                .with("phone", Value::optional(owner.phone.clone()))
                .with("apartments", count)
        })
        .collect()
}

pub fn owner_columns() -> Vec<Column> {
    vec![
        Column::new("Owner", "name").width(3),
        Column::new("Phone", "phone").width(2),
        Column::new("Apartments", "apartments").width(1).align(Align::Right),
    ]
}

/// Craftsmen with their score (or [`NO_SCORE`]) and open issue count.
pub fn craftsman_rows(dataset: &Dataset) -> Vec<Row> {
    dataset
        .craftsmen
        .iter()
        .map(|craftsman| {
            let open = dataset
                .issues
                .iter()
                .filter(|i| i.status.is_open() && i.craftsman_id.as_ref() == Some(&craftsman.id))
                .count();
            let score = craftsman.score.map_or_else(|| Value::text(NO_SCORE), Value::Number);
            Row::new()
                .with("id", Value::id(&craftsman.id))
                .with("name", craftsman.name.as_str())
                .with("trade", craftsman.trade.as_str())
                .with("phone", Value::optional(craftsman.phone.clone()))
                .with("skor", score)
                .with("open_issues", open)
        })
        .collect()
}

pub fn craftsman_columns() -> Vec<Column> {
    vec![
        Column::new("Name", "name").width(3),
        Column::new("Trade", "trade").width(2),
        Column::new("Phone", "phone").width(2),
        Column::new("Score", "skor").width(1).align(Align::Right),
        Column::new("Open", "open_issues").width(1).align(Align::Right),
    ]
}

pub fn issue_rows(dataset: &Dataset) -> Vec<Row> {
    let apartments = index_by_id(&dataset.apartments, |a| &a.id);
    let craftsmen = index_by_id(&dataset.craftsmen, |c| &c.id);
    dataset
        .issues
        .iter()
        .map(|issue| {
            let craftsman = issue
                .craftsman_id
                .as_ref()
                .and_then(|id| craftsmen.get(id))
                .map(|c| c.name.clone());
            Row::new()
                .with("id", Value::id(&issue.id))
                .with("title", issue.title.as_str())
                .with("apartment", apartment_label(&apartments, &issue.apartment_id))
                .with("craftsman", Value::optional(craftsman))
                .with("status", issue.status.label())
                .with("reported", iso(issue.reported_at))
        })
        .collect()
}

pub fn issue_columns() -> Vec<Column> {
    vec![
        Column::new("Issue", "title").width(4),
        Column::new("Apartment", "apartment").width(1),
        Column::new("Craftsman", "craftsman")
            .width(2)
            .render(|v| if v.is_missing() { "unassigned".into() } else { v.to_string() }),
        Column::new("Status", "status").width(1),
        Column::new("Reported", "reported")
            .width(1)
            .align(Align::Right)
            .render(display_date),
    ]
}

pub fn contract_rows(dataset: &Dataset) -> Vec<Row> {
    let users = index_by_id(&dataset.users, |u| &u.id);
    let apartments = index_by_id(&dataset.apartments, |a| &a.id);
    dataset
        .contracts
        .iter()
        .map(|contract| {
            let apartment = apartments.get(&contract.apartment_id);
            Row::new()
                .with("id", Value::id(&contract.id))
                .with("apartment", apartment_label(&apartments, &contract.apartment_id))
                .with(
                    "owner",
                    user_name(&users, apartment.and_then(|a| a.owner_id.as_ref())),
                )
                .with("tenant", user_name(&users, Some(&contract.tenant_id)))
                .with("start", iso(contract.start))
                .with("end", Value::optional(contract.end.map(iso)))
                .with("rent", contract.monthly_rent)
                .with("currency", contract.currency.as_str())
        })
        .collect()
}

pub fn contract_columns() -> Vec<Column> {
    vec![
        Column::new("Apartment", "apartment").width(1),
        Column::new("Owner", "owner").width(2),
        Column::new("Tenant", "tenant").width(2),
        Column::new("Start", "start").width(1).align(Align::Right).render(display_date),
        Column::new("End", "end")
            .width(1)
            .align(Align::Right)
            .render(|v| if v.is_missing() { "open".into() } else { display_date(v) }),
        Column::new("Rent", "rent").width(1).align(Align::Right).render(display_amount),
        Column::new("", "currency").width(1),
    ]
}

pub fn owners_table(dataset: &Dataset) -> TableDescriptor {
    TableDescriptor::new(owner_columns(), owner_rows(dataset))
}

/// Apartments belonging to `owner`.
pub fn owned_apartments_table(dataset: &Dataset, owner: &EntityId) -> TableDescriptor {
    let rows = apartment_rows(dataset)
        .into_iter()
        .zip(&dataset.apartments)
        .filter(|(_, apartment)| apartment.owner_id.as_ref() == Some(owner))
        .map(|(row, _)| row)
        .collect();
    TableDescriptor::new(apartment_columns(), rows)
}

/// Table for one of the browsable collections.
pub fn table_for(collection: Collection, dataset: &Dataset) -> TableDescriptor {
    match collection {
        Collection::Apartments => TableDescriptor::new(apartment_columns(), apartment_rows(dataset)),
        Collection::Tenants => TableDescriptor::new(tenant_columns(), tenant_rows(dataset)),
        Collection::Craftsmen => TableDescriptor::new(craftsman_columns(), craftsman_rows(dataset)),
        Collection::Issues => TableDescriptor::new(issue_columns(), issue_rows(dataset)),
        Collection::Contracts => TableDescriptor::new(contract_columns(), contract_rows(dataset)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::model::{Contract, Craftsman, Issue, IssueStatus, Role};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn user(id: u64, name: &str, role: Role) -> User {
        User {
            id: id.into(),
            name: name.into(),
            role,
            email: None,
            phone: None,
        }
    }

    fn apartment(id: u64, block: &str, number: &str, owner: Option<u64>) -> Apartment {
        Apartment {
            id: id.into(),
            block: block.into(),
            number: number.into(),
            floor: Some(2),
            rooms: Some("2+1".into()),
            area_m2: None,
            owner_id: owner.map(EntityId::from),
        }
    }

    pub(crate) fn dataset() -> Dataset {
        Dataset {
            users: vec![
                user(1, "Zeynep Demir", Role::Owner),
                user(2, "Murat Şahin", Role::Owner),
                user(10, "Can Öztürk", Role::Tenant),
                user(11, "Elif Aydın", Role::Tenant),
            ],
            apartments: vec![
                apartment(100, "A", "1", Some(1)),
                apartment(101, "A", "2", Some(1)),
                apartment(102, "B", "1", Some(2)),
                apartment(103, "B", "2", Some(99)),
            ],
            craftsmen: vec![
                Craftsman {
                    id: 50u64.into(),
                    name: "Hasan Usta".into(),
                    trade: "Plumbing".into(),
                    phone: None,
                    score: Some(4.5),
                },
                Craftsman {
                    id: 51u64.into(),
                    name: "Kemal Usta".into(),
                    trade: "Electrics".into(),
                    phone: None,
                    score: None,
                },
            ],
            contracts: vec![
                Contract {
                    id: 200u64.into(),
                    apartment_id: 100u64.into(),
                    tenant_id: 10u64.into(),
                    start: date(2022, 1, 1),
                    end: Some(date(2023, 1, 1)),
                    monthly_rent: 9000.0,
                    currency: "TRY".into(),
                },
                Contract {
                    id: 201u64.into(),
                    apartment_id: 102u64.into(),
                    tenant_id: 10u64.into(),
                    start: date(2023, 2, 1),
                    end: None,
                    monthly_rent: 12500.5,
                    currency: "TRY".into(),
                },
                Contract {
                    id: 202u64.into(),
                    apartment_id: 999u64.into(),
                    tenant_id: 11u64.into(),
                    start: date(2024, 5, 15),
                    end: None,
                    monthly_rent: 15000.0,
                    currency: "EUR".into(),
                },
            ],
            issues: vec![
                Issue {
                    id: 300u64.into(),
                    apartment_id: 100u64.into(),
                    craftsman_id: Some(50u64.into()),
                    title: "Leaking tap".into(),
                    status: IssueStatus::Open,
                    reported_at: date(2024, 6, 3),
                },
                Issue {
                    id: 301u64.into(),
                    apartment_id: 102u64.into(),
                    craftsman_id: Some(50u64.into()),
                    title: "Boiler pressure".into(),
                    status: IssueStatus::Resolved,
                    reported_at: date(2024, 1, 9),
                },
                Issue {
                    id: 302u64.into(),
                    apartment_id: 101u64.into(),
                    craftsman_id: None,
                    title: "Doorbell".into(),
                    status: IssueStatus::InProgress,
                    reported_at: date(2024, 7, 21),
                },
            ],
        }
    }

    #[test]
    fn test_apartment_owner_join() {
        let rows = apartment_rows(&dataset());
        assert_eq!(rows[0].value("owner"), &Value::text("Zeynep Demir"));
        assert_eq!(rows[2].value("owner"), &Value::text("Murat Şahin"));
        // Owner 99 does not exist.
        assert!(rows[3].value("owner").is_missing());
        assert_eq!(rows[0].value("label"), &Value::text("A-1"));
    }

    #[test]
    fn test_tenant_latest_contract() {
        let rows = tenant_rows(&dataset());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value("apartment"), &Value::text("B-1"));
        assert_eq!(rows[0].value("since"), &Value::text("2023-02-01"));
        // Contract points at an apartment that does not exist.
        assert!(rows[1].value("apartment").is_missing());
        assert_eq!(rows[1].value("since"), &Value::text("2024-05-15"));
    }

    #[test]
    fn test_craftsman_score_and_open_issues() {
        let rows = craftsman_rows(&dataset());
        assert_eq!(rows[0].value("skor"), &Value::Number(4.5));
        assert_eq!(rows[0].value("open_issues"), &Value::Number(1.0));
        assert_eq!(rows[1].value("skor"), &Value::text(NO_SCORE));
        assert_eq!(rows[1].value("open_issues"), &Value::Number(0.0));
    }

    #[test]
    fn test_issue_join() {
        let data = dataset();
        let table = table_for(Collection::Issues, &data);
        let doorbell = &table.rows[2];
        assert!(doorbell.value("craftsman").is_missing());
        let craftsman = table.column("craftsman").unwrap();
        assert_eq!(craftsman.display(doorbell), "unassigned");
        assert_eq!(table.column("reported").unwrap().display(doorbell), "21.07.2024");
    }

    #[test]
    fn test_contract_join() {
        let data = dataset();
        let table = table_for(Collection::Contracts, &data);
        let second = &table.rows[1];
        assert_eq!(second.value("owner"), &Value::text("Murat Şahin"));
        assert_eq!(second.value("tenant"), &Value::text("Can Öztürk"));
        assert_eq!(table.column("rent").unwrap().display(second), "12500.50");
        assert_eq!(table.column("end").unwrap().display(second), "open");
        assert_eq!(table.column("start").unwrap().display(second), "01.02.2023");

        let dangling = &table.rows[2];
        assert!(dangling.value("apartment").is_missing());
        assert!(dangling.value("owner").is_missing());
    }

    #[test]
    fn test_owner_rows_count_apartments() {
        let rows = owner_rows(&dataset());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value("apartments"), &Value::Number(2.0));
        assert_eq!(rows[1].value("apartments"), &Value::Number(1.0));
    }

    #[test]
    fn test_owned_apartments() {
        let data = dataset();
        let table = owned_apartments_table(&data, &EntityId::Number(1));
        let labels: Vec<_> = table.rows.iter().map(|r| r.value("label").to_string()).collect();
        assert_eq!(labels, ["A-1", "A-2"]);
        assert!(owned_apartments_table(&data, &EntityId::Number(10)).rows.is_empty());
    }

    #[test]
    fn test_rows_keyed_by_backend_id() {
        let data = dataset();
        let table = table_for(Collection::Apartments, &data);
        assert_eq!(table.row_key(1), Some(crate::table::RowKey::Id("101".into())));
    }
}
