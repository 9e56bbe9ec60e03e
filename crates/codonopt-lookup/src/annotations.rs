//! Tab-separated annotation tables with `COG` and `EC_number` columns.

use crate::LookupError;

pub const COG_COLUMN: &str = "COG";
pub const EC_COLUMN: &str = "EC_number";
pub const KEGG_COLUMN: &str = "KEGG";

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    cog: Option<usize>,
    ec: Option<usize>,
}

impl AnnotationTable {
    /// Parse a table. At least one of the `COG` and `EC_number` columns must
    /// be present; short rows are padded with empty cells.
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        let mut lines = input.lines().filter(|l| !l.trim().is_empty());
        let header: Vec<String> = lines
            .next()
            .ok_or_else(|| LookupError::InvalidInput("empty annotation table".to_string()))?
            .split('\t')
            .map(|c| c.trim().to_string())
            .collect();

        let column = |name: &str| header.iter().position(|c| c == name);
        let cog = column(COG_COLUMN);
        let ec = column(EC_COLUMN);
        if cog.is_none() && ec.is_none() {
            return Err(LookupError::InvalidInput(format!(
                "expected a {COG_COLUMN} or {EC_COLUMN} column"
            )));
        }

        let width = header.len();
        let rows = lines
            .enumerate()
            .map(|(idx, line)| {
                let mut cells: Vec<String> = line.split('\t').map(str::to_string).collect();
                if cells.len() > width {
                    return Err(LookupError::InvalidInput(format!(
                        "row {} has {} cells, header has {width}",
                        idx + 1,
                        cells.len()
                    )));
                }
                cells.resize(width, String::new());
                Ok(cells)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            header,
            rows,
            cog,
            ec,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cog(&self, row: usize) -> Option<&str> {
        self.cell(row, self.cog?)
    }

    pub fn ec(&self, row: usize) -> Option<&str> {
        self.cell(row, self.ec?)
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        let value = self.rows.get(row)?.get(col)?.trim();
        (!value.is_empty()).then_some(value)
    }

    /// Render the table with a `KEGG` column holding `kegg[row]`. An
    /// existing `KEGG` column is overwritten.
    pub fn to_tsv(&self, kegg: &[String]) -> String {
        let existing = self.header.iter().position(|c| c == KEGG_COLUMN);
        let mut header = self.header.clone();
        if existing.is_none() {
            header.push(KEGG_COLUMN.to_string());
        }

        let mut out = header.join("\t");
        out.push('\n');
        for (i, row) in self.rows.iter().enumerate() {
            let value = kegg.get(i).cloned().unwrap_or_default();
            let mut cells = row.clone();
            match existing {
                Some(col) => cells[col] = value,
                None => cells.push(value),
            }
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "gene\tCOG\tEC_number\nrpoB\tCOG0085\t2.7.7.6\nhyp\t\t\nmdh\t\t1.1.1.37\n";

    #[test]
    fn test_parse_columns() {
        let table = AnnotationTable::parse(TABLE).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.cog(0), Some("COG0085"));
        assert_eq!(table.ec(0), Some("2.7.7.6"));
        assert_eq!(table.cog(1), None);
        assert_eq!(table.ec(1), None);
        assert_eq!(table.ec(2), Some("1.1.1.37"));
        assert_eq!(table.cog(9), None);
    }

    #[test]
    fn test_only_ec_column() {
        let table = AnnotationTable::parse("EC_number\n3.1.1.1\n").unwrap();
        assert_eq!(table.cog(0), None);
        assert_eq!(table.ec(0), Some("3.1.1.1"));
    }

    #[test]
    fn test_missing_columns() {
        assert!(AnnotationTable::parse("gene\tproduct\nrpoB\tpolymerase\n").is_err());
        assert!(AnnotationTable::parse("").is_err());
        assert!(AnnotationTable::parse("COG\nCOG0001\textra\n").is_err());
    }

    #[test]
    fn test_to_tsv_appends_kegg() {
        let table = AnnotationTable::parse(TABLE).unwrap();
        let kegg = vec!["K03043".to_string(), String::new(), "K00024".to_string()];
        assert_eq!(
            table.to_tsv(&kegg),
            "gene\tCOG\tEC_number\tKEGG\nrpoB\tCOG0085\t2.7.7.6\tK03043\nhyp\t\t\t\nmdh\t\t1.1.1.37\tK00024\n"
        );
    }

    #[test]
    fn test_to_tsv_overwrites_kegg() {
        let table = AnnotationTable::parse("COG\tKEGG\nCOG0001\tstale\n").unwrap();
        assert_eq!(table.to_tsv(&["K01845".to_string()]), "COG\tKEGG\nCOG0001\tK01845\n");
    }
}
