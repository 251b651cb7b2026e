pub fn execute() -> String {
    [
        "📖 Transfer console",
        "",
        "Wizard",
        "  type <internal|domestic|international>  Choose the transfer type (step 1)",
        "  from <account id>                       Choose the source account",
        "  set <field> <value>                     Fill a field, e.g. `set amount 250.00`",
        "  next / back                             Move between steps",
        "  status                                  Show the current step, draft and errors",
        "  new                                     Start a new transfer",
        "",
        "Money",
        "  accounts                                List your active accounts",
        "  fee                                     Show the fee breakdown for the draft",
        "",
        "Sending",
        "  submit                                  Submit from the amount step",
        "  pin <4 digits>                          Verify your transfer PIN and send",
        "  newpin <pin> <confirm>                  Create a transfer PIN",
        "  cancel                                  Close the PIN prompt",
        "  dismiss                                 Dismiss the error banner",
        "",
        "  quit                                    Leave",
        "",
        "Fields: recipient_name, to_account_number, to_routing_number, to_bank_name,",
        "to_iban, to_swift_code, to_bank_country, beneficiary_address, amount, description",
    ]
    .join("\n")
}
