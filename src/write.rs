use crate::{
    data::{Column, Ledger, Transaction},
    flow::FlowGraph,
};

/// Basic CSV exporter for a `Ledger`, under the header it was read with. The Category column
/// is always written, so a saved file keeps manual overrides.
pub(crate) fn write_ledger<W: std::io::Write>(
    writer: W,
    ledger: &Ledger,
) -> Result<(), anyhow::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(ledger.columns.names())?;
    for tx in ledger.iter() {
        wtr.write_record(ledger.columns.kinds().iter().map(|kind| cell(tx, *kind)))?;
    }
    wtr.flush()?;
    Ok(())
}

fn cell(tx: &Transaction, kind: Column) -> String {
    match kind {
        Column::Date => tx.date.map(|d| d.to_string()).unwrap_or_default(),
        Column::Description => tx.description.clone(),
        Column::Amount => tx.amount.to_string(),
        Column::Category => tx.category.clone(),
        // manual entries have no cells for these
        Column::Extra(i) => tx.extra.get(i).cloned().unwrap_or_default(),
    }
}

/// Sankey JSON exporter for a `FlowGraph`.
pub(crate) fn write_flow_graph<W: std::io::Write>(
    mut writer: W,
    graph: &FlowGraph,
) -> Result<(), anyhow::Error> {
    serde_json::to_writer_pretty(&mut writer, &graph.to_sankey())?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_flow_graph, write_ledger};
    use crate::{
        categorize::Categorizer,
        data::{Ledger, Transaction},
        flow::build_flow_graph,
        read::{read_ledger, CategoryPolicy},
        session::{NewEntry, Session},
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample() -> Ledger {
        Ledger::from(vec![
            Transaction {
                date: NaiveDate::from_ymd_opt(2024, 1, 2),
                description: "Loyer Janvier".to_string(),
                amount: dec!(-800),
                category: "Logement".to_string(),
                extra: vec![],
            },
            Transaction {
                date: None,
                description: "Café, croissant".to_string(),
                amount: dec!(-4.20),
                category: "Petit-déjeuner".to_string(),
                extra: vec![],
            },
        ])
    }

    #[test]
    fn write_csv() {
        let mut out = Vec::new();
        write_ledger(&mut out, &sample()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
Date,Description,Amount,Category
2024-01-02,Loyer Janvier,-800,Logement
,\"Café, croissant\",-4.20,Petit-déjeuner
"
        );
    }

    #[test]
    fn write_empty_ledger() {
        let mut out = Vec::new();
        write_ledger(&mut out, &Ledger::new()).unwrap();
        assert_eq!(out, b"Date,Description,Amount,Category\n");
    }

    #[test]
    fn round_trip() {
        let ledger = sample();
        let mut out = Vec::new();
        write_ledger(&mut out, &ledger).unwrap();

        let kept = read_ledger(&out[..], &Categorizer::default(), CategoryPolicy::KeepStored);
        assert_eq!(kept.unwrap(), ledger);

        // Recomputing only changes the manual override
        let recomputed =
            read_ledger(&out[..], &Categorizer::default(), CategoryPolicy::Recompute).unwrap();
        assert_eq!(recomputed.transactions[0], ledger.transactions[0]);
        assert_eq!(recomputed.transactions[1].category, "Autre");
    }

    #[test]
    fn round_trip_manual_entry() {
        let mut session = Session::new(Ledger::new(), Categorizer::default());
        session.add_entry(NewEntry {
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            description: "  Loyer Mai ".to_string(),
            amount: dec!(-800),
            category: None,
        });
        let mut out = Vec::new();
        write_ledger(&mut out, session.ledger()).unwrap();

        let reloaded =
            read_ledger(&out[..], &Categorizer::default(), CategoryPolicy::KeepStored).unwrap();
        assert_eq!(&reloaded, session.ledger());
        assert_eq!(reloaded.transactions[0].description, "Loyer Mai");
    }

    #[test]
    fn keep_input_columns() {
        let bank_csv = "\
Date,Description,Montant,Solde
2024-01-02,Loyer,-800,1200
";
        let ledger = read_ledger(
            bank_csv.as_bytes(),
            &Categorizer::default(),
            CategoryPolicy::Recompute,
        )
        .unwrap();
        let mut session = Session::new(ledger, Categorizer::default());
        session.add_entry(NewEntry {
            date: None,
            description: "Salaire".to_string(),
            amount: dec!(2500),
            category: None,
        });
        let mut out = Vec::new();
        write_ledger(&mut out, session.ledger()).unwrap();
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            "\
Date,Description,Montant,Solde,Category
2024-01-02,Loyer,-800,1200,Logement
,Salaire,2500,,Revenus
"
        );

        let reloaded =
            read_ledger(&out[..], &Categorizer::default(), CategoryPolicy::KeepStored).unwrap();
        assert_eq!(reloaded.transactions[0].extra, ["1200"]);
        assert_eq!(reloaded.transactions[1].extra, [""]);
        assert_eq!(
            reloaded.columns.names(),
            ["Date", "Description", "Montant", "Solde", "Category"]
        );
    }

    #[test]
    fn date_column_added_for_dated_entry() {
        let ledger = read_ledger(
            "Description,Montant,Catégorie\nLoyer,-800,\n".as_bytes(),
            &Categorizer::default(),
            CategoryPolicy::Recompute,
        )
        .unwrap();
        let mut session = Session::new(ledger, Categorizer::default());
        session.add_entry(NewEntry {
            date: NaiveDate::from_ymd_opt(2024, 6, 3),
            description: "Essence".to_string(),
            amount: dec!(-60),
            category: None,
        });
        let mut out = Vec::new();
        write_ledger(&mut out, session.ledger()).unwrap();
        assert_eq!(
            out,
            b"\
Description,Montant,Cat\xc3\xa9gorie,Date
Loyer,-800,Logement,
Essence,-60,Transport,2024-06-03
"
        );
    }

    #[test]
    fn write_sankey_json() {
        let mut out = Vec::new();
        write_flow_graph(&mut out, &build_flow_graph(&sample())).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "labels": ["Logement", "Petit-déjeuner", "Budget"],
                "source": [2, 2],
                "target": [0, 1],
                "value": [800.0, 4.2],
            })
        );
    }
}
