/*!

This is the long-form manual for `judge_pairing` and `brewsched`.

## Input files

All inputs are flat tabular files. The column names below are contractual:
renaming a column in the source spreadsheet breaks the corresponding loader.

### Assignment sheet (TSV)

One row per judge-to-table assignment, tab separated. Expected columns:

```text
FULL NAME    DESIRED TABLE TO JUDGE    PAIRING    RANKING    SUBSTYLES ENTERED
```

`DESIRED TABLE TO JUDGE` is a free-text field that embeds the date, an
optional AM/PM session, the site and the table number, for example:

```text
02/06 Arlington T68 American Pale Ale
02/07 AM Dallas T55 Kolsch and Blonde
```

The trailing style description is ignored. Rows whose field does not follow
this pattern (including the literal "no table" marker) are skipped and
reported; they are never part of the schedule.

`SUBSTYLES ENTERED` is a comma-separated list of substyle codes, e.g.
`21A, 23B`.

### Styles by table (CSV)

Maps each table to the substyles judged there:

```text
Table Number,BJCP Style Id,BJCP Style Name,Medal Category Name
68,21A,American IPA,India Pale Ale
68,21B,Specialty IPA,India Pale Ale
```

The first non-empty `Medal Category Name` seen for a table becomes its
display category.

### Entry counts (CSV)

```text
Table Number,Count
68,24
```

A table with no matching record defaults to a count of zero, which
suppresses workload warnings for that table.

### Judge roster (CSV, optional)

The master roster used for replacement suggestions:

```text
First Name,Last Name,BJCP Rank,JUDGE STATUS,SUBSTYLES ENTERED,ARLINGTON SITE,DALLAS SITE,...
```

Every column whose name ends in ` SITE` is treated as a driving distance in
miles to that site; blank or non-numeric cells mean the distance is
unknown. `JUDGE STATUS` must be `ACTIVE` (case insensitive) for a judge to
be considered. The legacy column name `Entries` is accepted in place of
`SUBSTYLES ENTERED`. Distances are computed offline by a separate geocoding
helper; this program only reads them.

## Classification rules

- A judge is certified-or-higher iff their rank label resolves to weight 3
  or 4. Unknown labels resolve to weight 0.
- Pairing cap per table: `min(certified, total_judges / 2)`, zero when no
  judge is certified.
- Workload bands for `entries / pairs`: up to 9 EXCELLENT, up to 12
  ACCEPTABLE, up to 15 OVERWORKED, above 15 CRITICAL. A table where no
  pairing is possible is CRITICAL regardless of its entry count.
- A judge conflicts with a table when the judge's entered substyle codes
  intersect the table's judged codes, compared as exact strings.

*/
