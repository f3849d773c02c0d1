//! Pre-built Test Fixtures
//!
//! Provides ready-to-use bill, user and CSV data. Values are fixed so
//! assertions can compare against literals.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{BillId, UserId};
use domain_billing::{Bill, BillInput, NewBill, Situation};
use domain_identity::{NewUser, User};

/// Fixture for calendar dates
pub struct DateFixtures;

impl DateFixtures {
    /// Due date of the reference bill (Jan 5, 2024)
    pub fn due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    /// Payment date of the reference bill (Jan 4, 2024)
    pub fn payment_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
    }

    pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }
}

/// Fixture for bill data
pub struct BillFixtures;

impl BillFixtures {
    /// The reference bill: 284.25, due 2024-01-05, paid on 2024-01-04
    pub fn paid_new_bill() -> NewBill {
        NewBill::new(DateFixtures::due_date(), dec!(284.25), "Bill description test 01")
            .with_payment_date(DateFixtures::payment_date())
            .with_situation(Situation::Paid)
    }

    /// An unpaid bill without payment date
    pub fn unpaid_new_bill() -> NewBill {
        NewBill::new(DateFixtures::ymd(2024, 2, 10), dec!(99.90), "Internet February")
    }

    /// The reference bill with an identifier
    pub fn paid_bill() -> Bill {
        Self::paid_new_bill().into_bill(BillId::new_v7())
    }

    /// A complete create request without situation
    pub fn input() -> BillInput {
        BillInput {
            payment_date: None,
            due_date: Some(DateFixtures::due_date()),
            amount: Some(dec!(284.25)),
            description: Some("Bill description test 01".to_string()),
            situation: None,
        }
    }
}

/// Fixture for CSV import documents
pub struct CsvFixtures;

impl CsvFixtures {
    /// Header using the Portuguese column names
    pub const HEADER: &'static str = "data_vencimento,data_pagamento,valor,descricao,situacao";

    /// Header using the English column names
    pub const ENGLISH_HEADER: &'static str = "due_date,payment_date,amount,description,situation";

    /// The reference row matching [`BillFixtures::paid_new_bill`]
    pub const REFERENCE_ROW: &'static str =
        "2024-01-05,2024-01-04,284.25,\"Bill description test 01\",PAID";

    /// A document with only the reference row
    pub fn single_row() -> String {
        format!("{}\n{}\n", Self::HEADER, Self::REFERENCE_ROW)
    }

    /// A document with blank optional fields
    pub fn blank_optionals() -> String {
        format!("{}\n2024-03-01,,45.00,Water March,\n", Self::HEADER)
    }

    /// A document with `count` valid rows, numbered from 1
    pub fn rows(count: usize) -> String {
        let mut csv = format!("{}\n", Self::HEADER);
        for n in 1..=count {
            let day = (n - 1) % 28 + 1;
            csv.push_str(&format!("2024-04-{day:02},,{n}.50,\"Bill {n:03}\",UNPAID\n"));
        }
        csv
    }

    /// A document whose second row carries an unparsable amount
    pub fn malformed_amount() -> String {
        format!(
            "{}\n{}\n2024-01-06,,abc,Broken,\n",
            Self::HEADER,
            Self::REFERENCE_ROW
        )
    }
}

/// Fixture for users
pub struct UserFixtures;

impl UserFixtures {
    pub const EMAIL: &'static str = "admin@bmstech.com.br";
    pub const PASSWORD: &'static str = "123456";
    pub const NAME: &'static str = "Admin";

    /// The admin user with a hashed password
    pub fn admin() -> User {
        NewUser::new(Self::NAME, Self::EMAIL, Self::PASSWORD)
            .into_user(UserId::new_v7())
            .unwrap()
    }
}
